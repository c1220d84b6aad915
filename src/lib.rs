//! Cough recording dataset handling and acoustic feature extraction.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod normalize;
pub mod pipeline;
pub mod split;
pub mod training;
pub mod types;

pub use error::{CoughError, Result};
pub use types::{
    AudioRecord, CoughCategory, FeatureMatrix, FeatureVector, PcmFormat, PcmSamples,
    SampleFormat, Sex, SpectrumValue,
};
