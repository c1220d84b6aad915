//! Dataset -> features -> fixed shapes -> split.

use ndarray::{Array2, Array3};
use serde::Serialize;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{reduce_to_vector, STATISTICS_PER_ROW};
use crate::normalize::normalize_batch;
use crate::split::SplitIndices;
use crate::types::AudioRecord;

/// Model-ready features for a whole dataset, indexed like the input records.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub names: Vec<String>,
    pub labels: Vec<usize>,
    /// `(records, n_mfcc, mfcc_frames)`
    pub mfcc: Array3<f64>,
    /// `(records, n_mfcc * 7)` summary statistics of the unpadded MFCCs.
    pub vectors: Array2<f64>,
    pub split: SplitIndices,
}

/// Serializable view of a [`PreparedDataset`] without the 3D tensor.
#[derive(Debug, Serialize)]
pub struct FeatureExport<'a> {
    pub names: &'a [String],
    pub labels: &'a [usize],
    pub split: &'a SplitIndices,
    pub vectors: Vec<Vec<f64>>,
}

impl PreparedDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn export(&self) -> FeatureExport<'_> {
        FeatureExport {
            names: &self.names,
            labels: &self.labels,
            split: &self.split,
            vectors: self.vectors.outer_iter().map(|row| row.to_vec()).collect(),
        }
    }
}

pub fn prepare(records: &[AudioRecord], config: &PipelineConfig) -> Result<PreparedDataset> {
    let extractor = config.extractor();
    let raw = extractor.mfcc_batch(records)?;

    let mfcc = normalize_batch(&raw, config.mfcc_frames)?;
    let mut vectors = Array2::zeros((raw.len(), config.mfcc.n_mfcc * STATISTICS_PER_ROW));
    for (matrix, mut row) in raw.iter().zip(vectors.outer_iter_mut()) {
        row.assign(&reduce_to_vector(matrix));
    }

    let split = config.splitter().partition(records.len())?;
    info!(
        records = records.len(),
        train = split.train.len(),
        validate = split.validate.len(),
        test = split.test.len(),
        "prepared mfcc features"
    );

    Ok(PreparedDataset {
        names: records.iter().map(|r| r.name().to_string()).collect(),
        labels: records.iter().map(|r| r.category().index()).collect(),
        mfcc,
        vectors,
        split,
    })
}

/// Scalograms of every record cut or padded to `scalogram_frames` samples.
pub fn prepare_scalograms(records: &[AudioRecord], config: &PipelineConfig) -> Result<Array3<f64>> {
    let raw = config.extractor().scalogram_batch(records)?;
    normalize_batch(&raw, config.scalogram_frames)
}
