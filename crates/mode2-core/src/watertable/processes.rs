//! Water-table response process functions.
//!
//! Pure functions implementing each step of the rainfall-to-water-table
//! mapping. All inputs and outputs are f64.

/// Step 1: exponentially filtered rainfall.
///
/// The filter state accumulates rainfall and decays geometrically with
/// time constant `kt` [1/month]:
///
/// `s_t = exp(-kt) * s_{t-1} + p_t`
pub fn filter_step(previous: f64, rainfall: f64, kt: f64) -> f64 {
    (-kt).exp() * previous + rainfall
}

/// Step 2: dimensionless recharge ratio.
///
/// Normalizes the filter state so that sustained rainfall at intensity
/// `hs` drives the ratio towards 1:
///
/// `r_t = (1 - exp(-kt)) * s_t / hs`
pub fn recharge_ratio(filtered: f64, hs: f64, kt: f64) -> f64 {
    (1.0 - (-kt).exp()) * filtered / hs
}

/// Step 3: water-table elevation from the recharge ratio.
///
/// The recharge ratio is saturated with tanh and mapped into the window
/// between `hmin` (floor) and `ho` (ceiling); `an` modulates the mobilized
/// fraction of the window and `cos_alpha` projects the vertically measured
/// depth onto the mean ground inclination.
pub fn water_table_level(recharge: f64, an: f64, ho: f64, hmin: f64, cos_alpha: f64) -> f64 {
    let rise = an * (ho - hmin) * recharge.tanh() / cos_alpha;
    (hmin + rise).clamp(hmin, ho)
}
