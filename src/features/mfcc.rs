use anyhow::{ensure, Result};
use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::FeatureMatrix;

pub const DEFAULT_N_MFCC: usize = 40;
pub const DEFAULT_N_FFT: usize = 4096;
const DEFAULT_HOP_LENGTH: usize = 512;
const DEFAULT_N_MELS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Hanning,
    Hamming,
}

impl From<Window> for WindowType {
    fn from(window: Window) -> Self {
        match window {
            Window::Hanning => WindowType::Hanning,
            Window::Hamming => WindowType::Hamming,
        }
    }
}

/// Options forwarded to the cepstral analysis routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MfccOptions {
    pub n_mfcc: usize,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub fmin: f64,
    /// Upper mel edge; Nyquist when absent.
    pub fmax: Option<f64>,
    pub window: Window,
    /// Pad `n_fft / 2` zeros on both sides so frames are centred on samples.
    pub center: bool,
}

impl Default for MfccOptions {
    fn default() -> Self {
        Self {
            n_mfcc: DEFAULT_N_MFCC,
            n_fft: DEFAULT_N_FFT,
            hop_length: DEFAULT_HOP_LENGTH,
            n_mels: DEFAULT_N_MELS,
            fmin: 0.0,
            fmax: None,
            window: Window::Hanning,
            center: true,
        }
    }
}

impl MfccOptions {
    pub fn with_n_mfcc(mut self, n_mfcc: usize) -> Self {
        self.n_mfcc = n_mfcc;
        self
    }

    pub fn with_n_fft(mut self, n_fft: usize) -> Self {
        self.n_fft = n_fft;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_mfcc > 0, "n_mfcc must be positive");
        ensure!(self.n_fft > 0, "n_fft must be positive");
        ensure!(self.hop_length > 0, "hop_length must be positive");
        ensure!(
            self.n_mels >= self.n_mfcc,
            "n_mels ({}) must be at least n_mfcc ({})",
            self.n_mels,
            self.n_mfcc
        );
        ensure!(self.fmin >= 0.0, "fmin must be non-negative");
        if let Some(fmax) = self.fmax {
            ensure!(fmax > self.fmin, "fmax must exceed fmin");
        }
        Ok(())
    }
}

/// Cepstral analysis backend. Output is `(n_mfcc, frames)`.
pub trait CepstralAnalyzer: Send + Sync {
    fn mfcc(&self, signal: &[f64], sample_rate: u32, options: &MfccOptions)
        -> Result<FeatureMatrix>;
}

/// MFCCs computed with the `aus` STFT, mel filterbank and DCT.
#[derive(Debug, Clone, Copy, Default)]
pub struct AusCepstrum;

impl CepstralAnalyzer for AusCepstrum {
    fn mfcc(
        &self,
        signal: &[f64],
        sample_rate: u32,
        options: &MfccOptions,
    ) -> Result<FeatureMatrix> {
        options.validate()?;
        ensure!(sample_rate > 0, "sample rate must be positive");
        ensure!(!signal.is_empty(), "signal is empty");

        let padded = frame_input(signal, options)?;
        let stft = spectrum::rstft(
            &padded,
            options.n_fft,
            options.hop_length,
            options.window.into(),
        );
        let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
        let power = analysis::make_power_spectrogram(&magnitude);

        let nyquist = sample_rate as f64 / 2.0;
        let freqs = spectrum::rfftfreq(options.n_fft, sample_rate);
        let filterbank = MelFilterbank::new(
            options.fmin,
            options.fmax.unwrap_or(nyquist).min(nyquist),
            options.n_mels,
            &freqs,
            true,
        );
        let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);
        let frames = analysis::mel::mfcc_spectrogram(&mel, options.n_mfcc, None);

        coefficients_by_frame(&frames, options.n_mfcc)
    }
}

fn frame_input(signal: &[f64], options: &MfccOptions) -> Result<Vec<f64>> {
    if !options.center {
        ensure!(
            signal.len() >= options.n_fft,
            "signal of {} samples is shorter than n_fft {}",
            signal.len(),
            options.n_fft
        );
        return Ok(signal.to_vec());
    }
    let pad = options.n_fft / 2;
    let mut padded = vec![0.0; pad];
    padded.extend_from_slice(signal);
    padded.resize((padded.len() + pad).max(options.n_fft), 0.0);
    Ok(padded)
}

/// Frames arrive as `[frame][coefficient]`; the matrix is `(coefficient, frame)`.
fn coefficients_by_frame(frames: &[Vec<f64>], n_mfcc: usize) -> Result<FeatureMatrix> {
    ensure!(!frames.is_empty(), "analysis produced no frames");
    let mut flat = Vec::with_capacity(frames.len() * n_mfcc);
    for frame in frames {
        ensure!(
            frame.len() == n_mfcc,
            "expected {} coefficients per frame, got {}",
            n_mfcc,
            frame.len()
        );
        flat.extend_from_slice(frame);
    }
    let by_frame = Array2::from_shape_vec((frames.len(), n_mfcc), flat)?;
    Ok(by_frame.reversed_axes().as_standard_layout().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_padding_covers_short_signals() {
        let options = MfccOptions::default();
        let padded = frame_input(&[1.0; 10], &options).unwrap();
        assert_eq!(padded.len(), 10 + DEFAULT_N_FFT);
        assert_eq!(padded[DEFAULT_N_FFT / 2], 1.0);
    }

    #[test]
    fn uncentred_short_signal_is_rejected() {
        let options = MfccOptions {
            center: false,
            ..MfccOptions::default()
        };
        assert!(frame_input(&[0.0; 100], &options).is_err());
    }

    #[test]
    fn transposes_frames_into_rows() {
        let frames = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let matrix = coefficients_by_frame(&frames, 2).unwrap();
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[0, 2]], 5.0);
        assert_eq!(matrix[[1, 0]], 2.0);
    }

    #[test]
    fn options_reject_more_coefficients_than_bands() {
        let options = MfccOptions {
            n_mels: 20,
            ..MfccOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: MfccOptions = serde_json::from_str(r#"{"n_mfcc": 13}"#).unwrap();
        assert_eq!(options.n_mfcc, 13);
        assert_eq!(options.n_fft, DEFAULT_N_FFT);
        assert!(serde_json::from_str::<MfccOptions>(r#"{"lifter": 22}"#).is_err());
    }
}
