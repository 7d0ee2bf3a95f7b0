//! mode2-core — the Mode II landslide displacement engine.
//!
//! Predicts landslide-body displacement from rainfall-driven groundwater
//! fluctuation using the two-block ("Mode II") limit-equilibrium and
//! viscoplastic creep model. Two public operations:
//!
//! - [`engine::calibrate`]: fit the water-table response model against
//!   measured data (Best Fit), or validate manually supplied parameters.
//! - [`engine::prevision`]: forecast displacement, velocity and safety
//!   factor from a calibrated water table, slope geometry and soil
//!   parameters.
//!
//! The engine is a pure library: file parsing, persistence, HTTP and
//! message rendering belong to the surrounding service. All inputs are
//! monthly series of exactly 12 values (one annual cycle).

pub mod creep;
pub mod engine;
pub mod error;
pub mod harmonics;
pub mod metrics;
pub mod optimize;
pub mod series;
pub mod stability;
pub mod watertable;

pub use engine::{
    calibrate, prevision, AnalysisSettings, CalibrationRequest, CalibrationResult,
    DisplacementUnit, PrevisionRequest, PrevisionResult, PrevisionType,
};
pub use error::{EngineError, ErrorCode};
pub use series::{Dataset, MonthlySeries, SeriesName};
pub use stability::params::{Geometry, GeotechnicalParams};
pub use watertable::calibrate::CalibrationMode;
pub use watertable::params::ModelParams;
