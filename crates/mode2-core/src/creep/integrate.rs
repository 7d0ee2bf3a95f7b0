//! Velocity and displacement integration over the harmonic water table.

use crate::error::EngineError;
use crate::harmonics::HarmonicSeries;
use crate::stability::ForceBalance;

/// Time discretization of the prevision horizon.
///
/// Results are reported at `steps` monthly nodes; the integral is taken
/// on `substeps` sub-monthly points per month, each sub-interval lasting
/// `seconds_per_step / substeps` seconds.
#[derive(Debug, Clone, Copy)]
pub struct TimeGrid {
    pub steps: usize,
    pub substeps: usize,
    pub seconds_per_step: f64,
}

/// Slope-parallel creep response at the monthly nodes.
///
/// Displacement in metres, velocity in m/s, safety factor dimensionless.
/// The horizontal projection by cos(beta1) is applied when the prevision
/// payload is assembled, not here.
#[derive(Debug, Clone)]
pub struct CreepSeries {
    pub displacement: Vec<f64>,
    pub velocity: Vec<f64>,
    pub safety_factor: Vec<f64>,
}

/// Integrate the viscoplastic law over the extended water-table signal.
///
/// Velocity at any instant is `net_thrust(z(t)) / mu` [m/s] — zero while
/// the factor of safety is at or above one. Displacement accumulates by
/// trapezoidal integration on the sub-monthly grid.
pub fn integrate(
    balance: &ForceBalance,
    water_table: &HarmonicSeries,
    mu: f64,
    grid: &TimeGrid,
) -> Result<CreepSeries, EngineError> {
    let mut displacement = Vec::with_capacity(grid.steps);
    let mut velocity = Vec::with_capacity(grid.steps);
    let mut safety_factor = Vec::with_capacity(grid.steps);

    let dt_seconds = grid.seconds_per_step / grid.substeps as f64;
    let dt_months = 1.0 / grid.substeps as f64;

    let speed_at = |t: f64| balance.net_thrust(water_table.eval(t)) / mu;

    let mut cumulative = 0.0;
    let mut previous_speed = speed_at(0.0);

    for month in 0..grid.steps {
        let t_node = month as f64;

        displacement.push(cumulative);
        velocity.push(speed_at(t_node));
        safety_factor.push(balance.factor_of_safety(water_table.eval(t_node)));

        // Advance one month on the sub-grid.
        for sub in 1..=grid.substeps {
            let t = t_node + sub as f64 * dt_months;
            let speed = speed_at(t);
            cumulative += 0.5 * (previous_speed + speed) * dt_seconds;
            previous_speed = speed;
        }
    }

    if displacement
        .iter()
        .chain(&velocity)
        .chain(&safety_factor)
        .any(|v| !v.is_finite())
    {
        return Err(EngineError::NonFinite("viscoplastic integration"));
    }

    Ok(CreepSeries {
        displacement,
        velocity,
        safety_factor,
    })
}
