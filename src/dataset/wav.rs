use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

use crate::error::{CoughError, Result};
use crate::types::{PcmFormat, PcmSamples, SampleFormat};

/// Decoded WAV contents, samples kept in their stored representation.
#[derive(Debug, Clone, PartialEq)]
pub struct WavContents {
    pub sample_rate: u32,
    pub format: PcmFormat,
    pub samples: PcmSamples,
}

/// Read a PCM WAV file without converting its samples.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavContents> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path).map_err(|err| CoughError::wav(path, err))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => PcmSamples::Int(
            reader
                .samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|err| CoughError::wav(path, err))?,
        ),
        hound::SampleFormat::Float => PcmSamples::Float(
            reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|err| CoughError::wav(path, err))?,
        ),
    };

    Ok(WavContents {
        sample_rate: spec.sample_rate,
        format: PcmFormat {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.sample_format {
                hound::SampleFormat::Int => SampleFormat::Int,
                hound::SampleFormat::Float => SampleFormat::Float,
            },
        },
        samples,
    })
}

/// Write samples back in the given format. Integer samples must fit `bits_per_sample`.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    format: PcmFormat,
    samples: &PcmSamples,
) -> Result<()> {
    let path = path.as_ref();

    let spec = WavSpec {
        channels: format.channels,
        sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: match format.sample_format {
            SampleFormat::Int => hound::SampleFormat::Int,
            SampleFormat::Float => hound::SampleFormat::Float,
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(|err| CoughError::wav(path, err))?;

    match samples {
        PcmSamples::Int(values) => {
            for &sample in values {
                writer
                    .write_sample(sample)
                    .map_err(|err| CoughError::wav(path, err))?;
            }
        }
        PcmSamples::Float(values) => {
            for &sample in values {
                writer
                    .write_sample(sample)
                    .map_err(|err| CoughError::wav(path, err))?;
            }
        }
    }

    writer.finalize().map_err(|err| CoughError::wav(path, err))?;

    Ok(())
}
