use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::DEFAULT_ROOT;
use crate::features::{default_widths, FeatureExtractor, MfccOptions};
use crate::normalize::{DEFAULT_MFCC_FRAMES, DEFAULT_SCALOGRAM_FRAMES};
use crate::split::{DatasetSplitter, SplitConfig};
use crate::training::DEFAULT_CLASS_WEIGHTS;

/// Every tunable of the feature pipeline, threaded explicitly through calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset_root: PathBuf,
    pub mfcc: MfccOptions,
    pub scalogram_widths: Vec<f64>,
    pub mfcc_frames: usize,
    pub scalogram_frames: usize,
    pub split: SplitConfig,
    pub class_weights: Vec<f64>,
    pub max_spectrum_frequency: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from(DEFAULT_ROOT),
            mfcc: MfccOptions::default(),
            scalogram_widths: default_widths(),
            mfcc_frames: DEFAULT_MFCC_FRAMES,
            scalogram_frames: DEFAULT_SCALOGRAM_FRAMES,
            split: SplitConfig::default(),
            class_weights: DEFAULT_CLASS_WEIGHTS.to_vec(),
            max_spectrum_frequency: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults, or the JSON file at `path` layered over them.
    pub fn from_override(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse config file {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        self.mfcc.validate().context("invalid mfcc options")?;
        self.split.validate()?;
        ensure!(self.mfcc_frames > 0, "mfcc_frames must be positive");
        ensure!(self.scalogram_frames > 0, "scalogram_frames must be positive");
        ensure!(
            !self.scalogram_widths.is_empty() && self.scalogram_widths.iter().all(|w| *w > 0.0),
            "scalogram widths must be positive"
        );
        ensure!(
            self.class_weights.iter().all(|w| *w > 0.0),
            "class weights must be positive"
        );
        Ok(())
    }

    pub fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new()
            .with_mfcc_options(self.mfcc.clone())
            .with_widths(self.scalogram_widths.clone())
    }

    pub fn splitter(&self) -> DatasetSplitter {
        DatasetSplitter::new(self.split)
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineConfig;

    #[test]
    fn defaults_match_published_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.mfcc.n_mfcc, 40);
        assert_eq!(config.mfcc.n_fft, 4096);
        assert_eq!(config.mfcc_frames, 150);
        assert_eq!(config.scalogram_frames, 150_000);
        assert_eq!(config.scalogram_widths.len(), 20);
        assert_eq!(config.split.test_fraction, 0.1);
        assert_eq!(config.split.validate_fraction, 0.15);
        assert!(config.split.seed.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"split": {"seed": 777}, "mfcc": {"n_mfcc": 20}}"#).unwrap();

        let config = PipelineConfig::from_override(Some(&path)).unwrap();
        assert_eq!(config.split.seed, Some(777));
        assert_eq!(config.split.test_fraction, 0.1);
        assert_eq!(config.mfcc.n_mfcc, 20);
        assert_eq!(config.mfcc_frames, 150);
    }

    #[test]
    fn rejects_invalid_split() {
        let mut config = PipelineConfig::default();
        config.split.test_fraction = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = PipelineConfig::from_override(Some(std::path::Path::new("/no/such/config.json")))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
