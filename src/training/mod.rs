//! Classifier contract consumed by the feature pipeline, plus a baseline model.

pub mod checkpoint;
pub mod metrics;

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoughError, Result};
use crate::split::SplitIndices;

pub use checkpoint::CheckpointKeeper;
pub use metrics::{evaluate, ClassMetrics, Evaluation};

/// Per-category loss weights (normal, wet, whistling, covid).
pub const DEFAULT_CLASS_WEIGHTS: [f64; 4] = [1.0, 5.0, 5.0, 7.0];

const STD_FLOOR: f64 = 1e-12;

/// Anything that learns integer labels from rows of a feature matrix.
pub trait Classifier {
    fn fit(&mut self, features: ArrayView2<f64>, labels: &[usize]) -> Result<()>;
    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<usize>>;
}

/// Standardised nearest-centroid classifier.
///
/// Squared distances are divided by the class weight, so heavier classes win ties
/// over a wider region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearestCentroid {
    class_weights: Vec<f64>,
    fitted: Option<FittedCentroids>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedCentroids {
    mean: Array1<f64>,
    std: Array1<f64>,
    centroids: Array2<f64>,
    present: Vec<bool>,
}

impl NearestCentroid {
    pub fn new(class_weights: Vec<f64>) -> Self {
        Self {
            class_weights,
            fitted: None,
        }
    }

    fn weight(&self, class: usize) -> f64 {
        self.class_weights
            .get(class)
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(1.0)
    }
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, features: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        if features.nrows() != labels.len() {
            return Err(CoughError::MisalignedInputs {
                items: features.nrows(),
                labels: labels.len(),
            });
        }
        if labels.is_empty() {
            return Err(CoughError::Training("no training samples".to_string()));
        }

        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| CoughError::Training("no training samples".to_string()))?;
        let std = features.std_axis(Axis(0), 0.0).mapv(|s| s.max(STD_FLOOR));
        let scaled = (&features - &mean) / &std;

        let n_classes = labels.iter().max().map_or(0, |m| m + 1);
        let mut centroids = Array2::zeros((n_classes, features.ncols()));
        let mut counts = vec![0usize; n_classes];
        for (row, &label) in scaled.outer_iter().zip(labels) {
            let mut centroid = centroids.row_mut(label);
            centroid += &row;
            counts[label] += 1;
        }
        for (mut centroid, &count) in centroids.outer_iter_mut().zip(&counts) {
            if count > 0 {
                centroid /= count as f64;
            }
        }

        info!(samples = labels.len(), classes = n_classes, "fitted nearest-centroid baseline");
        self.fitted = Some(FittedCentroids {
            mean,
            std,
            centroids,
            present: counts.iter().map(|&c| c > 0).collect(),
        });
        Ok(())
    }

    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<usize>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| CoughError::Training("classifier has not been fitted".to_string()))?;
        if features.ncols() != fitted.mean.len() {
            return Err(CoughError::Training(format!(
                "expected {} features, got {}",
                fitted.mean.len(),
                features.ncols()
            )));
        }
        let scaled = (&features - &fitted.mean) / &fitted.std;

        Ok(scaled
            .outer_iter()
            .map(|row| {
                fitted
                    .centroids
                    .outer_iter()
                    .enumerate()
                    .filter(|(class, _)| fitted.present[*class])
                    .map(|(class, centroid)| {
                        let distance: f64 = (&row - &centroid).mapv(|d| d * d).sum();
                        (class, distance / self.weight(class))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map_or(0, |(class, _)| class)
            })
            .collect())
    }
}

/// Fit on the training rows and evaluate on the test rows of `features`.
pub fn fit_and_evaluate<C: Classifier>(
    classifier: &mut C,
    features: &Array2<f64>,
    labels: &[usize],
    indices: &SplitIndices,
    n_classes: usize,
) -> Result<Evaluation> {
    if features.nrows() != labels.len() {
        return Err(CoughError::MisalignedInputs {
            items: features.nrows(),
            labels: labels.len(),
        });
    }
    let rows = indices.select_rows(features);
    let targets = indices.select(labels);

    classifier.fit(rows.train.view(), &targets.train)?;
    let predictions = classifier.predict(rows.test.view())?;
    evaluate(&predictions, &targets.test, n_classes)
}
