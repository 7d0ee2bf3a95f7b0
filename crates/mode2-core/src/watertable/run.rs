//! Forward simulation of the water-table response model.

use crate::error::EngineError;
use crate::series::{MonthlySeries, MONTHS_PER_YEAR};

use super::params::ModelParams;
use super::processes;

/// Simulate the water table over one annual rainfall cycle.
///
/// The level responds to rainfall with a one-month infiltration lag: the
/// filter state at month t accumulates rainfall up to month t-1, so the
/// first month sits at the floor of the response window. `alpha_deg` is
/// the mean ground-surface inclination (the geometry's `i_pc`), degrees.
/// Parameters are assumed validated by the caller; the result is checked
/// for finiteness before it is returned.
pub fn simulate(
    rainfall: &MonthlySeries,
    params: &ModelParams,
    alpha_deg: f64,
) -> Result<MonthlySeries, EngineError> {
    if !alpha_deg.is_finite() || !(0.0..90.0).contains(&alpha_deg) {
        return Err(EngineError::InvalidParameter {
            name: "i_pc",
            reason: "inclination must lie in [0, 90) degrees".to_string(),
        });
    }
    let cos_alpha = alpha_deg.to_radians().cos();

    let mut levels = [0.0; MONTHS_PER_YEAR];
    let mut filtered = 0.0;
    for (month, p) in rainfall.iter().enumerate() {
        let recharge = processes::recharge_ratio(filtered, params.hs, params.kt);
        levels[month] =
            processes::water_table_level(recharge, params.an, params.ho, params.hmin, cos_alpha);
        filtered = processes::filter_step(filtered, p, params.kt);
    }

    if levels.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::NonFinite("water-table simulation"));
    }
    MonthlySeries::new(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> ModelParams {
        ModelParams {
            hs: 161.9,
            kt: 2.9,
            an: 0.9,
            ho: 0.0,
            hmin: -1.773,
        }
    }

    #[test]
    fn dry_year_stays_at_hmin() {
        let rain = MonthlySeries::new([0.0; 12]).unwrap();
        let levels = simulate(&rain, &params(), 7.99).unwrap();
        for v in levels.iter() {
            assert_relative_eq!(v, -1.773);
        }
    }

    #[test]
    fn first_month_sits_at_the_floor() {
        let rain = MonthlySeries::new([100.0; 12]).unwrap();
        let levels = simulate(&rain, &params(), 7.99).unwrap();
        assert_relative_eq!(levels[0], -1.773);
        assert!(levels[1] > -1.773);
    }

    #[test]
    fn wet_month_raises_the_following_level() {
        let mut rain = [0.0; 12];
        rain[5] = 160.0;
        let levels = simulate(&MonthlySeries::new(rain).unwrap(), &params(), 7.99).unwrap();
        assert_relative_eq!(levels[5], -1.773);
        assert!(levels[6] > -1.773);
        // Two months on, the filter has decayed almost completely.
        assert!(levels[7] < levels[6]);
    }

    #[test]
    fn levels_stay_inside_the_window() {
        let rain = MonthlySeries::new([500.0; 12]).unwrap();
        let levels = simulate(&rain, &params(), 7.99).unwrap();
        for v in levels.iter() {
            assert!(v >= -1.773 && v <= 0.0);
        }
    }

    #[test]
    fn rejects_vertical_inclination() {
        let rain = MonthlySeries::new([1.0; 12]).unwrap();
        assert!(simulate(&rain, &params(), 90.0).is_err());
        assert!(simulate(&rain, &params(), -5.0).is_err());
        assert!(simulate(&rain, &params(), f64::NAN).is_err());
    }
}
