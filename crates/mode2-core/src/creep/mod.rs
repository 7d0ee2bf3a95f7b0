//! Viscoplastic displacement integration.
//!
//! Below the stability threshold the landslide creeps: velocity is the
//! net thrust divided by the viscosity coefficient, and displacement is
//! the running integral of velocity over elapsed time. Above the
//! threshold velocity is exactly zero.

pub mod integrate;
pub mod viscosity;

pub use integrate::{integrate, CreepSeries, TimeGrid};
pub use viscosity::best_fit_viscosity;
