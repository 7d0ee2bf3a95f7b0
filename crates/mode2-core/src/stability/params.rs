//! Slope geometry and geotechnical parameters.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

fn invalid(name: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(name, "must be a positive number"));
    }
    Ok(())
}

fn check_angle(name: &'static str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || !(0.0..90.0).contains(&value) {
        return Err(invalid(name, "must lie in [0, 90) degrees"));
    }
    Ok(())
}

/// Two-block sliding-surface geometry.
///
/// - `l1`, `l2`: downstream / upstream block base lengths [m]
/// - `h`: depth of the sliding surface below ground [m]
/// - `beta1`, `beta2`: base inclinations [degrees]
/// - `i_pc`: mean ground-surface inclination [degrees]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub l1: f64,
    pub l2: f64,
    pub h: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub i_pc: f64,
}

impl Geometry {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_positive("l1", self.l1)?;
        check_positive("l2", self.l2)?;
        check_positive("h", self.h)?;
        check_angle("beta1", self.beta1)?;
        check_angle("beta2", self.beta2)?;
        check_angle("i_pc", self.i_pc)?;
        Ok(())
    }
}

/// Soil strength and viscosity parameters.
///
/// - `gamma_sat`, `gamma_w`: saturated soil / water unit weights [kN/m3]
/// - `fi`: basal friction angle [degrees]
/// - `c`: cohesion [kPa]
/// - `mu`: viscosity coefficient [kN*month/m2]
/// - `fi_interface`: friction angle on the inter-block surface [degrees]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeotechnicalParams {
    pub gamma_sat: f64,
    pub gamma_w: f64,
    pub fi: f64,
    pub c: f64,
    pub mu: f64,
    pub fi_interface: f64,
}

impl GeotechnicalParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_positive("gamma_sat", self.gamma_sat)?;
        check_positive("gamma_w", self.gamma_w)?;
        check_angle("fi", self.fi)?;
        check_angle("fi_interface", self.fi_interface)?;
        if !self.c.is_finite() || self.c < 0.0 {
            return Err(invalid("c", "cohesion must be >= 0"));
        }
        check_positive("mu", self.mu)?;
        Ok(())
    }
}
