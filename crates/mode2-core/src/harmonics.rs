//! Harmonic extension of an annual series.
//!
//! Represents a 12-sample monthly cycle as a truncated Fourier series with
//! a 12-month fundamental period, so the signal becomes evaluable at
//! arbitrary real time offsets. The Viscoplastic integrator samples it at
//! sub-monthly points when integrating velocity.
//!
//! Twelve samples determine at most six harmonics; requested harmonics
//! beyond the Nyquist limit alias onto lower ones and are ignored, which
//! keeps the reconstruction error at the sample points non-increasing in
//! the requested count (and exactly zero from six harmonics up).

use std::f64::consts::PI;

use crate::series::{MonthlySeries, MONTHS_PER_YEAR};

/// Fundamental period of every imported series [months].
pub const FUNDAMENTAL_PERIOD: f64 = MONTHS_PER_YEAR as f64;

/// Highest harmonic resolvable from 12 samples.
pub const NYQUIST_HARMONIC: usize = MONTHS_PER_YEAR / 2;

/// Truncated Fourier representation of one annual cycle.
#[derive(Debug, Clone)]
pub struct HarmonicSeries {
    mean: f64,
    cos_coefficients: Vec<f64>,
    sin_coefficients: Vec<f64>,
}

impl HarmonicSeries {
    /// Fit `num_harmonics` Fourier terms to the 12 monthly samples.
    ///
    /// Coefficients are the discrete Fourier sums over the sample points;
    /// the cosine term at the Nyquist harmonic carries half weight so the
    /// full six-harmonic fit interpolates the samples exactly.
    pub fn fit(series: &MonthlySeries, num_harmonics: usize) -> Self {
        let n = MONTHS_PER_YEAR as f64;
        let k_max = num_harmonics.min(NYQUIST_HARMONIC);

        let mean = series.iter().sum::<f64>() / n;

        let mut cos_coefficients = Vec::with_capacity(k_max);
        let mut sin_coefficients = Vec::with_capacity(k_max);
        for k in 1..=k_max {
            let omega = 2.0 * PI * k as f64 / FUNDAMENTAL_PERIOD;
            let mut a = 0.0;
            let mut b = 0.0;
            for (t, y) in series.iter().enumerate() {
                let phase = omega * t as f64;
                a += y * phase.cos();
                b += y * phase.sin();
            }
            if k == NYQUIST_HARMONIC {
                cos_coefficients.push(a / n);
                sin_coefficients.push(0.0);
            } else {
                cos_coefficients.push(2.0 * a / n);
                sin_coefficients.push(2.0 * b / n);
            }
        }

        Self {
            mean,
            cos_coefficients,
            sin_coefficients,
        }
    }

    /// Number of harmonic terms actually carried.
    pub fn harmonics(&self) -> usize {
        self.cos_coefficients.len()
    }

    /// Evaluate the series at a real time offset `t` [months].
    pub fn eval(&self, t: f64) -> f64 {
        let mut value = self.mean;
        for (k, (a, b)) in self
            .cos_coefficients
            .iter()
            .zip(&self.sin_coefficients)
            .enumerate()
        {
            let omega = 2.0 * PI * (k + 1) as f64 / FUNDAMENTAL_PERIOD;
            value += a * (omega * t).cos() + b * (omega * t).sin();
        }
        value
    }
}
