mod mfcc;
mod scalogram;
mod spectrum;
mod statistics;

use rayon::prelude::*;
use tracing::debug;

pub use mfcc::{
    AusCepstrum, CepstralAnalyzer, MfccOptions, Window, DEFAULT_N_FFT, DEFAULT_N_MFCC,
};
pub use scalogram::{cwt, default_widths, ricker};
pub use spectrum::amplitude_spectrum;
pub use statistics::{reduce_to_vector, STATISTICS_PER_ROW};

use crate::error::{CoughError, Result};
use crate::types::{AudioRecord, FeatureMatrix, SpectrumValue};

/// Average interleaved multi-channel samples into one value per frame.
///
/// Single-channel input is returned unchanged. A trailing partial frame is dropped.
pub fn to_mono(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Mono signal of a record as raw (unscaled) sample values.
pub fn mono_signal(record: &AudioRecord) -> Vec<f64> {
    to_mono(&record.samples().to_f64(), record.channels())
}

/// Turns recordings into MFCC matrices, scalograms and spectra.
#[derive(Debug, Clone)]
pub struct FeatureExtractor<C = AusCepstrum> {
    cepstrum: C,
    mfcc: MfccOptions,
    widths: Vec<f64>,
}

impl FeatureExtractor<AusCepstrum> {
    pub fn new() -> Self {
        Self::with_analyzer(AusCepstrum)
    }
}

impl Default for FeatureExtractor<AusCepstrum> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CepstralAnalyzer> FeatureExtractor<C> {
    pub fn with_analyzer(cepstrum: C) -> Self {
        Self {
            cepstrum,
            mfcc: MfccOptions::default(),
            widths: default_widths(),
        }
    }

    pub fn with_mfcc_options(mut self, options: MfccOptions) -> Self {
        self.mfcc = options;
        self
    }

    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.widths = widths;
        self
    }

    pub fn mfcc_options(&self) -> &MfccOptions {
        &self.mfcc
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// `(n_mfcc, frames)` matrix; the frame count depends on the clip length.
    pub fn compute_mfcc(&self, record: &AudioRecord) -> Result<FeatureMatrix> {
        let signal = mono_signal(record);
        let matrix = self
            .cepstrum
            .mfcc(&signal, record.sample_rate(), &self.mfcc)
            .map_err(|err| CoughError::extraction(record.name(), err.to_string()))?;
        if matrix.nrows() != self.mfcc.n_mfcc {
            return Err(CoughError::extraction(
                record.name(),
                format!(
                    "expected {} coefficients, analyzer returned {}",
                    self.mfcc.n_mfcc,
                    matrix.nrows()
                ),
            ));
        }
        debug!(record = record.name(), shape = ?matrix.dim(), "computed mfcc");
        Ok(matrix)
    }

    /// `(widths, samples)` matrix of Ricker wavelet responses.
    pub fn compute_scalogram(&self, record: &AudioRecord) -> Result<FeatureMatrix> {
        let signal = mono_signal(record);
        let matrix = cwt(&signal, &self.widths)
            .map_err(|err| CoughError::extraction(record.name(), err.to_string()))?;
        debug!(record = record.name(), shape = ?matrix.dim(), "computed scalogram");
        Ok(matrix)
    }

    pub fn compute_amplitude_spectrum(
        &self,
        record: &AudioRecord,
        max_frequency: Option<f64>,
    ) -> Result<Vec<SpectrumValue>> {
        amplitude_spectrum(&mono_signal(record), record.sample_rate(), max_frequency)
            .map_err(|err| CoughError::extraction(record.name(), err.to_string()))
    }

    /// MFCCs for every record, computed in parallel; output order matches input order.
    pub fn mfcc_batch(&self, records: &[AudioRecord]) -> Result<Vec<FeatureMatrix>> {
        records
            .par_iter()
            .map(|record| self.compute_mfcc(record))
            .collect()
    }

    pub fn scalogram_batch(&self, records: &[AudioRecord]) -> Result<Vec<FeatureMatrix>> {
        records
            .par_iter()
            .map(|record| self.compute_scalogram(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoughCategory, PcmFormat, PcmSamples};
    use ndarray::Array2;

    struct FixedFrames(usize);

    impl CepstralAnalyzer for FixedFrames {
        fn mfcc(
            &self,
            signal: &[f64],
            _sample_rate: u32,
            options: &MfccOptions,
        ) -> anyhow::Result<FeatureMatrix> {
            anyhow::ensure!(!signal.is_empty(), "signal is empty");
            Ok(Array2::from_elem((self.0.min(options.n_mfcc), 3), signal[0]))
        }
    }

    fn record(name: &str, channels: u16, samples: Vec<i32>) -> AudioRecord {
        let format = PcmFormat {
            channels,
            ..PcmFormat::mono_i16()
        };
        AudioRecord::new(
            name,
            None,
            CoughCategory::Normal,
            8_000,
            format,
            PcmSamples::Int(samples),
        )
        .unwrap()
    }

    #[test]
    fn stereo_frames_are_averaged() {
        assert_eq!(to_mono(&[2.0, 4.0, 6.0, 8.0], 2), vec![3.0, 7.0]);
    }

    #[test]
    fn mono_passes_through() {
        let samples = [1.0, -5.0, 2.5];
        assert_eq!(to_mono(&samples, 1), samples.to_vec());
    }

    #[test]
    fn mono_signal_uses_record_channels() {
        let stereo = record("s", 2, vec![2, 4, 6, 8]);
        assert_eq!(mono_signal(&stereo), vec![3.0, 7.0]);
    }

    #[test]
    fn batch_preserves_record_order() {
        let extractor = FeatureExtractor::with_analyzer(FixedFrames(DEFAULT_N_MFCC));
        let records: Vec<_> = (0..16).map(|i| record("r", 1, vec![i; 4])).collect();
        let matrices = extractor.mfcc_batch(&records).unwrap();
        for (i, matrix) in matrices.iter().enumerate() {
            assert_eq!(matrix[[0, 0]], i as f64);
        }
    }

    #[test]
    fn failures_name_the_record() {
        let extractor = FeatureExtractor::with_analyzer(FixedFrames(DEFAULT_N_MFCC));
        let err = extractor.compute_mfcc(&record("silent", 1, vec![])).unwrap_err();
        match err {
            CoughError::FeatureExtraction { record, .. } => assert_eq!(record, "silent"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn coefficient_count_is_checked() {
        let extractor = FeatureExtractor::with_analyzer(FixedFrames(3));
        assert!(extractor.compute_mfcc(&record("a", 1, vec![1])).is_err());
    }

    #[test]
    fn scalogram_uses_configured_widths() {
        let extractor = FeatureExtractor::new().with_widths(vec![1.0, 2.0, 4.0]);
        let matrix = extractor
            .compute_scalogram(&record("a", 1, vec![0, 1, 0, -1, 0, 1, 0, -1]))
            .unwrap();
        assert_eq!(matrix.dim(), (3, 8));
    }
}
