//! Best-Fit calibration of the water-table response model.
//!
//! Automatic mode searches (hs, kt, an) by nonlinear least squares against
//! the measured series; `ho` is fixed at 0 and `hmin` at the measured
//! minimum, as the original Best Fit Pioggia does. Manual mode skips the
//! search and only validates the caller-supplied parameters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::metrics;
use crate::optimize::{self, SearchOptions};
use crate::series::MonthlySeries;

use super::constants::{
    ABS_TOLERANCE, AN_BOUNDS, AN_INITIAL, HS_BOUNDS, KT_BOUNDS, KT_INITIAL, MAX_ITERATIONS,
    REL_TOLERANCE,
};
use super::params::ModelParams;
use super::run;

/// How the model parameters are obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Nonlinear least-squares search from closed-form initial guesses.
    Automatic,
    /// Caller-supplied parameters, validated only.
    Manual { params: ModelParams },
}

/// Residual and convergence record of a calibration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FitDiagnostics {
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit (hs, kt, an) to the measured water table, driven by rainfall.
///
/// Initial guesses: hs = max(rainfall), kt and an from the documented
/// heuristics, hmin = min(measured). Fails with `CALIBRATION_FAILED` when
/// the simplex search exhausts its iteration budget or the result violates
/// the parameter domain.
pub fn best_fit(
    rainfall: &MonthlySeries,
    measured: &MonthlySeries,
    alpha_deg: f64,
) -> Result<(ModelParams, FitDiagnostics), EngineError> {
    let ho = 0.0;
    let hmin = measured.min();
    let hs_initial = rainfall.max().clamp(HS_BOUNDS.0, HS_BOUNDS.1);

    let assemble = |x: &[f64]| ModelParams {
        hs: x[0],
        kt: x[1],
        an: x[2],
        ho,
        hmin,
    };

    // Reject malformed measured data (e.g. a positive minimum) before
    // the search touches the model.
    assemble(&[hs_initial, KT_INITIAL, AN_INITIAL]).validate()?;

    let objective = |x: &[f64]| -> f64 {
        match run::simulate(rainfall, &assemble(x), alpha_deg) {
            Ok(simulated) => metrics::sse(measured.values(), simulated.values()),
            Err(_) => f64::INFINITY,
        }
    };

    let options = SearchOptions {
        max_iterations: MAX_ITERATIONS,
        abs_tolerance: ABS_TOLERANCE,
        rel_tolerance: REL_TOLERANCE,
    };
    let outcome = optimize::nelder_mead(
        objective,
        &[hs_initial, KT_INITIAL, AN_INITIAL],
        &[0.1 * hs_initial, 0.5, 0.1],
        &[HS_BOUNDS, KT_BOUNDS, AN_BOUNDS],
        &options,
    );

    debug!(
        iterations = outcome.iterations,
        converged = outcome.converged,
        sse = outcome.objective,
        "best-fit water-table calibration finished"
    );

    if !outcome.converged {
        return Err(EngineError::CalibrationDiverged {
            iterations: outcome.iterations,
        });
    }
    if !outcome.objective.is_finite() {
        return Err(EngineError::CalibrationOutOfBounds(
            "residual is not finite".to_string(),
        ));
    }

    let params = assemble(&outcome.params);
    params
        .validate()
        .map_err(|e| EngineError::CalibrationOutOfBounds(e.to_string()))?;

    let simulated = run::simulate(rainfall, &params, alpha_deg)?;
    let diagnostics = FitDiagnostics {
        sse: outcome.objective,
        rmse: metrics::rmse(measured.values(), simulated.values()),
        iterations: outcome.iterations,
        converged: outcome.converged,
    };
    Ok((params, diagnostics))
}
