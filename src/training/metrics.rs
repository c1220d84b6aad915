use std::fmt::{Display, Formatter};

use ndarray::Array2;
use serde::Serialize;

use crate::error::{CoughError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Test-set report: confusion counts, row-normalised confusion, accuracy, per-class scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub confusion: Array2<usize>,
    /// Each row divided by the number of true samples of that class.
    pub normalized_confusion: Array2<f64>,
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
}

pub fn evaluate(predictions: &[usize], truth: &[usize], n_classes: usize) -> Result<Evaluation> {
    if predictions.len() != truth.len() {
        return Err(CoughError::MisalignedInputs {
            items: predictions.len(),
            labels: truth.len(),
        });
    }
    if let Some(&label) = predictions
        .iter()
        .chain(truth)
        .find(|&&label| label >= n_classes)
    {
        return Err(CoughError::Training(format!(
            "label {} outside of {} classes",
            label, n_classes
        )));
    }

    let mut confusion = Array2::<usize>::zeros((n_classes, n_classes));
    for (&actual, &predicted) in truth.iter().zip(predictions) {
        confusion[[actual, predicted]] += 1;
    }

    let correct: usize = (0..n_classes).map(|c| confusion[[c, c]]).sum();
    let accuracy = ratio(correct, truth.len());

    let mut normalized_confusion = Array2::<f64>::zeros((n_classes, n_classes));
    let per_class = (0..n_classes)
        .map(|class| {
            let support: usize = confusion.row(class).sum();
            let predicted: usize = confusion.column(class).sum();
            let hits = confusion[[class, class]];
            for other in 0..n_classes {
                normalized_confusion[[class, other]] = ratio(confusion[[class, other]], support);
            }
            let precision = ratio(hits, predicted);
            let recall = ratio(hits, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    Ok(Evaluation {
        confusion,
        normalized_confusion,
        accuracy,
        per_class,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>8} {:>9} {:>9} {:>9} {:>8}", "class", "precision", "recall", "f1", "support")?;
        for (class, metrics) in self.per_class.iter().enumerate() {
            writeln!(
                f,
                "{:>8} {:>9.2} {:>9.2} {:>9.2} {:>8}",
                class, metrics.precision, metrics.recall, metrics.f1, metrics.support
            )?;
        }
        writeln!(f, "accuracy {:.3}", self.accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_predictions_score_one() {
        let labels = [0, 1, 2, 3, 3];
        let report = evaluate(&labels, &labels, 4).unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert!(report.per_class.iter().all(|m| m.f1 == 1.0));
        assert_eq!(report.normalized_confusion[[3, 3]], 1.0);
    }

    #[test]
    fn confusion_rows_are_true_labels() {
        let truth = [0, 0, 0, 1];
        let predicted = [0, 1, 1, 1];
        let report = evaluate(&predicted, &truth, 2).unwrap();

        assert_eq!(report.confusion[[0, 1]], 2);
        assert_relative_eq!(report.normalized_confusion[[0, 0]], 1.0 / 3.0);
        assert_relative_eq!(report.accuracy, 0.5);

        let wrong_class = report.per_class[1];
        assert_relative_eq!(wrong_class.precision, 1.0 / 3.0);
        assert_relative_eq!(wrong_class.recall, 1.0);
        assert_relative_eq!(wrong_class.f1, 0.5);
        assert_eq!(wrong_class.support, 1);
    }

    #[test]
    fn classes_without_support_report_zero() {
        let report = evaluate(&[0, 0], &[0, 0], 3).unwrap();
        assert_eq!(report.per_class[2].support, 0);
        assert_eq!(report.per_class[2].f1, 0.0);
        assert_eq!(report.normalized_confusion.row(2).sum(), 0.0);
    }

    #[test]
    fn rejects_out_of_range_labels() {
        assert!(evaluate(&[4], &[0], 4).is_err());
        assert!(evaluate(&[0, 1], &[0], 4).is_err());
    }
}
