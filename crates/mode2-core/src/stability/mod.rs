//! Two-block limit-equilibrium analysis.
//!
//! The sliding body is modeled as two rigid blocks on a composite surface
//! (`beta1` downstream, `beta2` upstream) separated by an internal shear
//! surface. The force balance yields the factor of safety for any
//! water-table elevation and, in closed form, the elevation at which the
//! factor of safety equals one.

pub mod equilibrium;
pub mod params;

pub use equilibrium::ForceBalance;
pub use params::{Geometry, GeotechnicalParams};
