use ndarray::{Array1, ArrayView1, Axis};

use crate::types::{FeatureMatrix, FeatureVector};

/// mean, min, max, median, variance, skewness, kurtosis
pub const STATISTICS_PER_ROW: usize = 7;

/// Relative variance below which a row is treated as constant.
const CONSTANT_ROW_EPSILON: f64 = 1e-14;

/// Summarise every row over the time axis.
///
/// The layout is statistic-major: all row means, then all row minima, and so on,
/// giving `rows * STATISTICS_PER_ROW` values whatever the number of columns.
/// Statistics that are undefined (empty rows, higher moments of constant rows) are 0.0.
pub fn reduce_to_vector(matrix: &FeatureMatrix) -> FeatureVector {
    let rows = matrix.len_of(Axis(0));
    let mut vector = Array1::zeros(rows * STATISTICS_PER_ROW);
    for (row_idx, row) in matrix.outer_iter().enumerate() {
        for (stat_idx, value) in row_statistics(row).into_iter().enumerate() {
            vector[stat_idx * rows + row_idx] = value;
        }
    }
    vector
}

fn row_statistics(row: ArrayView1<f64>) -> [f64; STATISTICS_PER_ROW] {
    if row.is_empty() {
        return [0.0; STATISTICS_PER_ROW];
    }
    let n = row.len() as f64;
    let mean = row.sum() / n;
    let min = row.fold(f64::INFINITY, |acc, &v| acc.min(v));
    let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));

    let central_moment = |power: i32| row.iter().map(|v| (v - mean).powi(power)).sum::<f64>() / n;
    let m2 = central_moment(2);
    let (skewness, kurtosis) = if m2 <= CONSTANT_ROW_EPSILON * mean * mean {
        (0.0, 0.0)
    } else {
        let m3 = central_moment(3);
        let m4 = central_moment(4);
        (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
    };

    [mean, min, max, median(row), m2, skewness, kurtosis]
}

fn median(row: ArrayView1<f64>) -> f64 {
    let mut sorted = row.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    #[test]
    fn vector_length_is_independent_of_time_axis() {
        for frames in [0, 1, 5, 150] {
            let matrix = Array2::<f64>::ones((40, frames));
            assert_eq!(reduce_to_vector(&matrix).len(), 40 * STATISTICS_PER_ROW);
        }
    }

    #[test]
    fn statistics_are_laid_out_by_statistic() {
        let matrix = array![[1.0, 2.0, 3.0, 10.0], [0.0, 0.0, 0.0, 0.0]];
        let vector = reduce_to_vector(&matrix);

        // row 0 occupies even slots, row 1 odd slots
        assert_abs_diff_eq!(vector[0], 4.0, epsilon = 1e-12); // mean
        assert_abs_diff_eq!(vector[2], 1.0, epsilon = 1e-12); // min
        assert_abs_diff_eq!(vector[4], 10.0, epsilon = 1e-12); // max
        assert_abs_diff_eq!(vector[6], 2.5, epsilon = 1e-12); // median
        assert_abs_diff_eq!(vector[8], 12.5, epsilon = 1e-12); // variance
        for stat in 0..STATISTICS_PER_ROW {
            assert_eq!(vector[stat * 2 + 1], 0.0);
        }
    }

    #[test]
    fn skew_and_kurtosis_use_biased_fisher_definitions() {
        let row = array![[1.0, 2.0, 3.0, 10.0]];
        let vector = reduce_to_vector(&row);
        // deviations -3, -2, -1, 6: m2 = 12.5, m3 = 45, m4 = 348.5
        let m2: f64 = 12.5;
        assert_abs_diff_eq!(vector[5], 45.0 / m2.powf(1.5), epsilon = 1e-12);
        assert_abs_diff_eq!(vector[6], 348.5 / (m2 * m2) - 3.0, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_row_has_zero_skew() {
        let vector = reduce_to_vector(&array![[-2.0, -1.0, 0.0, 1.0, 2.0]]);
        assert_abs_diff_eq!(vector[5], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vector[3], 0.0, epsilon = 1e-12);
    }
}
