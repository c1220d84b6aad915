//! Fixed-length time axis for 2D features.

use ndarray::{s, Array2, Array3};

use crate::error::{CoughError, Result};
use crate::types::FeatureMatrix;

/// MFCC frames kept per record.
pub const DEFAULT_MFCC_FRAMES: usize = 150;
/// Scalogram samples kept per record.
pub const DEFAULT_SCALOGRAM_FRAMES: usize = 150_000;

/// Force the time axis (columns) to `target_length`.
///
/// Shorter matrices are right-padded with zeros, longer ones keep columns
/// `[0, target_length)`. Rows are untouched.
pub fn normalize(matrix: &FeatureMatrix, target_length: usize) -> FeatureMatrix {
    let (rows, columns) = matrix.dim();
    if columns == target_length {
        return matrix.clone();
    }
    let kept = columns.min(target_length);
    let mut normalized = Array2::zeros((rows, target_length));
    normalized
        .slice_mut(s![.., ..kept])
        .assign(&matrix.slice(s![.., ..kept]));
    normalized
}

/// Normalize a whole batch and stack it into `(records, rows, target_length)`.
///
/// All matrices must share the same row count.
pub fn normalize_batch(matrices: &[FeatureMatrix], target_length: usize) -> Result<Array3<f64>> {
    let rows = matrices.first().map_or(0, |m| m.nrows());
    let mut stacked = Array3::zeros((matrices.len(), rows, target_length));
    for (index, (matrix, mut slot)) in matrices
        .iter()
        .zip(stacked.outer_iter_mut())
        .enumerate()
    {
        if matrix.nrows() != rows {
            return Err(CoughError::FeatureExtraction {
                record: format!("#{index}"),
                reason: format!("{} feature rows, expected {}", matrix.nrows(), rows),
            });
        }
        slot.assign(&normalize(matrix, target_length));
    }
    Ok(stacked)
}
