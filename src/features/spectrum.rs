use anyhow::{ensure, Result};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::types::SpectrumValue;

/// Magnitudes of the non-negative frequency bins of a real signal.
///
/// Uses the whole signal as one transform, bin `k` sits at `k * sample_rate / len`.
/// Bins above `max_frequency` are dropped when it is given.
pub fn amplitude_spectrum(
    signal: &[f64],
    sample_rate: u32,
    max_frequency: Option<f64>,
) -> Result<Vec<SpectrumValue>> {
    ensure!(!signal.is_empty(), "signal is empty");
    ensure!(sample_rate > 0, "sample rate must be positive");

    let len = signal.len();
    let fft = FftPlanner::<f64>::new().plan_fft_forward(len);
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let bin_width = sample_rate as f64 / len as f64;
    Ok(buffer
        .iter()
        .take(len / 2 + 1)
        .enumerate()
        .map(|(k, value)| SpectrumValue {
            frequency: k as f64 * bin_width,
            magnitude: value.norm(),
        })
        .filter(|bin| max_frequency.map_or(true, |max| bin.frequency <= max))
        .collect())
}
