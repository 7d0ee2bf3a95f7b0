//! Fit diagnostics for calibration objectives.
//!
//! All metrics take observed and simulated slices of equal length and
//! return a scalar score.

/// Sum of squared errors. Range: [0, inf), 0 = perfect.
///
/// The objective minimized by both the Best-Fit calibration and the
/// viscosity search.
pub fn sse(observed: &[f64], simulated: &[f64]) -> f64 {
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum()
}

/// Root Mean Square Error. Range: [0, inf), 0 = perfect.
pub fn rmse(observed: &[f64], simulated: &[f64]) -> f64 {
    (sse(observed, simulated) / observed.len() as f64).sqrt()
}

/// Mean Absolute Error. Range: [0, inf), 0 = perfect.
pub fn mae(observed: &[f64], simulated: &[f64]) -> f64 {
    let n = observed.len() as f64;
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).abs())
        .sum::<f64>()
        / n
}

/// Nash-Sutcliffe Efficiency. Range: (-inf, 1], 1 = perfect.
pub fn nse(observed: &[f64], simulated: &[f64]) -> f64 {
    let n = observed.len();
    let mean_obs: f64 = observed.iter().sum::<f64>() / n as f64;
    let denominator: f64 = observed.iter().map(|o| (o - mean_obs).powi(2)).sum();
    if denominator == 0.0 {
        return f64::NEG_INFINITY;
    }
    1.0 - sse(observed, simulated) / denominator
}
