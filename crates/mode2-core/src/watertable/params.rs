//! Water-table response model parameters.
//!
//! Produced by the Best-Fit calibration or supplied directly in manual
//! mode; immutable once produced and consumed by the prevision.
//!
//! - `hs`: rainfall scale [mm], > 0
//! - `kt`: decay constant [1/month], > 0
//! - `an`: dimensionless coefficient, typically 0-1
//! - `ho`: water-table offset, the ceiling of the response window [m]
//! - `hmin`: minimum water-table elevation [m], <= 0

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub hs: f64,
    pub kt: f64,
    pub an: f64,
    pub ho: f64,
    pub hmin: f64,
}

impl ModelParams {
    /// Check domain constraints on every field.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |name: &'static str, reason: &str| EngineError::InvalidParameter {
            name,
            reason: reason.to_string(),
        };

        if !self.hs.is_finite() || self.hs <= 0.0 {
            return Err(invalid("hs", "rainfall scale must be a positive number"));
        }
        if !self.kt.is_finite() || self.kt <= 0.0 {
            return Err(invalid("kt", "decay constant must be a positive number"));
        }
        if !self.an.is_finite() {
            return Err(invalid("an", "coefficient must be a finite number"));
        }
        if !self.ho.is_finite() {
            return Err(invalid("ho", "offset must be a finite number"));
        }
        if !self.hmin.is_finite() || self.hmin > 0.0 {
            return Err(invalid("hmin", "minimum water table must be <= 0"));
        }
        if self.ho < self.hmin {
            return Err(invalid("ho", "offset must not lie below hmin"));
        }
        Ok(())
    }
}
