//! Back-calibration of the viscosity coefficient.
//!
//! Two stages: a reference run at an ideal (low-damping) viscosity,
//! rescaled proportionally so the computed maximum matches the measured
//! one (displacement is exactly inversely proportional to viscosity),
//! followed by a bounded one-dimensional refinement of the squared-error
//! objective.

use tracing::debug;

use crate::error::EngineError;
use crate::harmonics::HarmonicSeries;
use crate::metrics;
use crate::optimize::{self, SearchOptions};
use crate::stability::ForceBalance;

use super::integrate::{integrate, CreepSeries, TimeGrid};

/// Ideal reference viscosity for the scaling run [kN*month/m2].
pub const MU_REFERENCE: f64 = 1.0e9;

/// Width of the refinement bracket around the proportional estimate.
const BRACKET_FACTOR: f64 = 10.0;

/// Iteration cap for the golden-section refinement.
const MAX_ITERATIONS: usize = 200;

/// Resolve the viscosity that best reproduces the measured displacement.
///
/// `measured` is the cumulative displacement at the monthly nodes in
/// metres; `projection` is the cos(beta1) factor mapping slope-parallel
/// displacement to the measured horizontal one. Returns the resolved
/// viscosity together with the creep series computed at it.
pub fn best_fit_viscosity(
    balance: &ForceBalance,
    water_table: &HarmonicSeries,
    measured: &[f64],
    projection: f64,
    grid: &TimeGrid,
) -> Result<(f64, CreepSeries), EngineError> {
    let reference = integrate(balance, water_table, MU_REFERENCE, grid)?;
    let reference_max = reference
        .displacement
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    if reference_max <= 0.0 {
        return Err(EngineError::ViscosityBracket(
            "the safety factor never drops below one".to_string(),
        ));
    }

    let measured_max = measured.iter().copied().fold(0.0_f64, f64::max);
    if measured_max <= 0.0 {
        return Err(EngineError::ViscosityBracket(
            "measured displacement has no positive values".to_string(),
        ));
    }

    // Displacement scales as 1/mu, so matching maxima gives the estimate.
    let mu_estimate = MU_REFERENCE * projection * reference_max / measured_max;

    let objective = |mu: f64| -> f64 {
        match integrate(balance, water_table, mu, grid) {
            Ok(series) => {
                let projected: Vec<f64> =
                    series.displacement.iter().map(|d| d * projection).collect();
                metrics::sse(measured, &projected)
            }
            Err(_) => f64::INFINITY,
        }
    };

    let options = SearchOptions {
        max_iterations: MAX_ITERATIONS,
        abs_tolerance: 0.0,
        rel_tolerance: 1e-9,
    };
    let outcome = optimize::golden_section(
        objective,
        mu_estimate / BRACKET_FACTOR,
        mu_estimate * BRACKET_FACTOR,
        &options,
    );

    debug!(
        mu_estimate,
        mu = outcome.params[0],
        sse = outcome.objective,
        iterations = outcome.iterations,
        "viscosity back-calibration finished"
    );

    if !outcome.converged || !outcome.objective.is_finite() {
        return Err(EngineError::ViscosityBracket(
            "squared-error objective did not settle within the bracket".to_string(),
        ));
    }

    let mu = outcome.params[0];
    let series = integrate(balance, water_table, mu, grid)?;
    Ok((mu, series))
}
