use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the library.
pub type Result<T> = std::result::Result<T, CoughError>;

#[derive(Debug, Error)]
pub enum CoughError {
    #[error("dataset i/o failed at {path:?}: {source}")]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("wav i/o failed at {path:?}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("invalid audio record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },
    #[error("cannot resolve label for {directory:?}: {matches} matching tokens")]
    LabelResolution { directory: String, matches: usize },
    #[error("invalid split fractions test={test} validate={validate}")]
    InvalidFraction { test: f64, validate: f64 },
    #[error("inputs are misaligned: {items} items vs {labels} labels")]
    MisalignedInputs { items: usize, labels: usize },
    #[error("feature extraction failed for record '{record}': {reason}")]
    FeatureExtraction { record: String, reason: String },
    #[error("training failed: {0}")]
    Training(String),
    #[error("checkpoint at {path:?} failed: {reason}")]
    Checkpoint { path: PathBuf, reason: String },
}

impl CoughError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DatasetIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        match source {
            hound::Error::IoError(err) => Self::io(path, err),
            other => Self::Wav {
                path: path.into(),
                source: other,
            },
        }
    }

    pub(crate) fn extraction(record: &str, reason: impl Into<String>) -> Self {
        Self::FeatureExtraction {
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the filesystem / WAV decoding family of failures.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::DatasetIo { .. } | Self::Wav { .. })
    }
}
