//! Core types for the cough classification pipeline

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{CoughError, Result};

/// 2D feature grid, rows are features (cepstral coefficients, wavelet scales)
/// and columns are time.
pub type FeatureMatrix = Array2<f64>;

/// Summary statistics of a [`FeatureMatrix`], `rows * STATISTICS_PER_ROW` long.
pub type FeatureVector = Array1<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Cough category. The discriminant doubles as the integer class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoughCategory {
    Normal = 0,
    Wet = 1,
    Whistling = 2,
    Covid = 3,
}

impl CoughCategory {
    pub const ALL: [CoughCategory; 4] = [
        CoughCategory::Normal,
        CoughCategory::Wet,
        CoughCategory::Whistling,
        CoughCategory::Covid,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
    Int,
    Float,
}

/// PCM layout of the source WAV file, kept so records can be written back losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
}

impl PcmFormat {
    pub fn mono_i16() -> Self {
        Self {
            channels: 1,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Interleaved (frame-major) samples exactly as stored in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum PcmSamples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl PcmSamples {
    pub fn len(&self) -> usize {
        match self {
            PcmSamples::Int(values) => values.len(),
            PcmSamples::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw sample values widened to f64. Integer samples are not rescaled.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            PcmSamples::Int(values) => values.iter().map(|&v| v as f64).collect(),
            PcmSamples::Float(values) => values.iter().map(|&v| v as f64).collect(),
        }
    }
}

/// One labelled cough recording.
///
/// Labels come from the containing directory name and are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRecord {
    name: String,
    sex: Option<Sex>,
    category: CoughCategory,
    sample_rate: u32,
    format: PcmFormat,
    samples: PcmSamples,
}

impl AudioRecord {
    pub fn new(
        name: impl Into<String>,
        sex: Option<Sex>,
        category: CoughCategory,
        sample_rate: u32,
        format: PcmFormat,
        samples: PcmSamples,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| CoughError::InvalidRecord {
            name: name.clone(),
            reason,
        };
        if sample_rate == 0 {
            return Err(invalid("sample rate must be positive".to_string()));
        }
        if format.channels == 0 {
            return Err(invalid("channel count must be positive".to_string()));
        }
        if samples.len() % format.channels as usize != 0 {
            return Err(invalid(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                format.channels
            )));
        }
        Ok(Self {
            name,
            sex,
            category,
            sample_rate,
            format,
            samples,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    pub fn category(&self) -> CoughCategory {
        self.category
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    pub fn samples(&self) -> &PcmSamples {
        &self.samples
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// One bin of a half-spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumValue {
    pub frequency: f64,
    pub magnitude: f64,
}
