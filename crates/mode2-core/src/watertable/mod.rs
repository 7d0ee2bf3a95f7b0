//! Rainfall-driven water-table response model and its Best-Fit calibration.
//!
//! The water table responds to rainfall through a damped first-order
//! filter: each month's driving term decays geometrically with time
//! constant `kt`, is scaled by `hs`, saturated, and mapped into the
//! elevation window between `hmin` and the offset `ho`.

pub mod calibrate;
pub mod constants;
pub mod params;
pub mod processes;
pub mod run;

pub use calibrate::{best_fit, CalibrationMode, FitDiagnostics};
pub use params::ModelParams;
pub use run::simulate;
