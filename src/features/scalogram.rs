use anyhow::{ensure, Result};
use ndarray::Array2;
use rayon::prelude::*;

use crate::types::FeatureMatrix;

const WAVELET_SPAN: f64 = 10.0;

/// Scales 1..=20.
pub fn default_widths() -> Vec<f64> {
    (1..=20).map(f64::from).collect()
}

/// Ricker ("Mexican hat") wavelet of `points` samples centred on the middle sample.
pub fn ricker(points: usize, width: f64) -> Vec<f64> {
    let amplitude = 2.0 / ((3.0 * width).sqrt() * std::f64::consts::PI.powf(0.25));
    let width_sq = width * width;
    let centre = (points as f64 - 1.0) / 2.0;
    (0..points)
        .map(|i| {
            let x = i as f64 - centre;
            let x_sq = x * x;
            amplitude * (1.0 - x_sq / width_sq) * (-x_sq / (2.0 * width_sq)).exp()
        })
        .collect()
}

/// Continuous wavelet transform, one row per width, each `signal.len()` long.
pub fn cwt(signal: &[f64], widths: &[f64]) -> Result<FeatureMatrix> {
    ensure!(!signal.is_empty(), "signal is empty");
    ensure!(!widths.is_empty(), "no wavelet widths given");
    ensure!(
        widths.iter().all(|&w| w.is_finite() && w > 0.0),
        "wavelet widths must be positive"
    );

    let rows: Vec<Vec<f64>> = widths
        .par_iter()
        .map(|&width| {
            let points = ((WAVELET_SPAN * width).ceil() as usize).min(signal.len());
            convolve_same(signal, &ricker(points, width))
        })
        .collect();

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((widths.len(), signal.len()), flat)?)
}

/// Discrete convolution cropped to the input length, centred like `mode="same"`.
fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let k = kernel.len();
    let offset = (k.saturating_sub(1)) / 2;
    (0..n)
        .map(|i| {
            let full = i + offset;
            let lo = full.saturating_sub(n - 1);
            let hi = full.min(k - 1);
            (lo..=hi).map(|j| signal[full - j] * kernel[j]).sum()
        })
        .collect()
}
