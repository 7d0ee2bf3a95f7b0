//! Two-block force balance.
//!
//! Per-unit-width equilibrium of two rigid slabs of thickness `h` on
//! bases inclined at `beta1` and `beta2`, with Mohr-Coulomb resistance on
//! both bases, pore-pressure reduction from the water table, and an
//! at-rest frictional resistance on the inter-block shear surface.
//!
//! The resisting force is affine in the water height above the sliding
//! surface, so the critical water table (factor of safety = 1) has a
//! closed form.

use crate::error::EngineError;

use super::params::{Geometry, GeotechnicalParams};

/// Precomputed force terms for one slope configuration.
///
/// Construction fails when the configuration is degenerate (non-positive
/// driving force, or a water-insensitive balance that admits no critical
/// water table).
#[derive(Debug, Clone, Copy)]
pub struct ForceBalance {
    /// Gravitational driving force along the bases [kN/m].
    drive: f64,
    /// Resisting force with a dry sliding surface [kN/m].
    resist_dry: f64,
    /// Resistance lost per metre of normal water height [kN/m per m].
    pore_slope: f64,
    /// Projection of vertical depths onto the ground inclination.
    cos_ipc: f64,
    /// Sliding-surface depth [m].
    depth: f64,
    /// cos(beta1), the horizontal projection used for outputs.
    cos_beta1: f64,
}

impl ForceBalance {
    /// Assemble the balance from validated geometry and soil parameters.
    pub fn new(geometry: &Geometry, soil: &GeotechnicalParams) -> Result<Self, EngineError> {
        let beta1 = geometry.beta1.to_radians();
        let beta2 = geometry.beta2.to_radians();
        let fi = soil.fi.to_radians();
        let fi_interface = soil.fi_interface.to_radians();
        let cos_ipc = geometry.i_pc.to_radians().cos();

        // Block weights per unit width.
        let w1 = soil.gamma_sat * geometry.h * geometry.l1;
        let w2 = soil.gamma_sat * geometry.h * geometry.l2;

        let drive = w1 * beta1.sin() + w2 * beta2.sin();

        // At-rest thrust on the inter-block surface, mobilizing the
        // interface friction angle.
        let interface =
            0.5 * soil.gamma_sat * geometry.h * geometry.h * (1.0 - fi.sin()) * fi_interface.tan();

        let cohesion = soil.c * (geometry.l1 + geometry.l2);
        let friction_dry = (w1 * beta1.cos() + w2 * beta2.cos()) * fi.tan();
        let resist_dry = cohesion + friction_dry + interface;

        // Pore force per metre of normal water height, infinite-slope
        // u = gamma_w * hw * cos^2(beta) on each base.
        let pore_slope = soil.gamma_w
            * (beta1.cos().powi(2) * geometry.l1 + beta2.cos().powi(2) * geometry.l2)
            * fi.tan();

        if !drive.is_finite() || !resist_dry.is_finite() || !pore_slope.is_finite() {
            return Err(EngineError::NonFinite("limit-equilibrium balance"));
        }
        if drive <= 0.0 {
            return Err(EngineError::DegenerateGeometry(
                "non-positive driving force".to_string(),
            ));
        }
        if pore_slope <= 0.0 {
            return Err(EngineError::DegenerateGeometry(
                "water table has no effect on the balance (fi = 0)".to_string(),
            ));
        }

        Ok(Self {
            drive,
            resist_dry,
            pore_slope,
            cos_ipc,
            depth: geometry.h,
            cos_beta1: beta1.cos(),
        })
    }

    /// Water height above the sliding surface, normal to the slope, for a
    /// water-table elevation `z` [m, <= 0 below ground].
    fn normal_water_height(&self, z: f64) -> f64 {
        (self.depth + z).clamp(0.0, self.depth) * self.cos_ipc
    }

    /// Resisting force for water-table elevation `z` [kN/m].
    pub fn resist(&self, z: f64) -> f64 {
        self.resist_dry - self.pore_slope * self.normal_water_height(z)
    }

    /// Factor of safety for water-table elevation `z`.
    pub fn factor_of_safety(&self, z: f64) -> f64 {
        self.resist(z) / self.drive
    }

    /// Net thrust past equilibrium [kN/m]; zero while the slope is stable.
    pub fn net_thrust(&self, z: f64) -> f64 {
        (self.drive - self.resist(z)).max(0.0)
    }

    /// Water-table elevation at which the factor of safety equals one.
    ///
    /// Unclamped: values outside [-h, 0] mean the slope never (or always)
    /// reaches equilibrium within the physical window.
    pub fn critical_elevation(&self) -> f64 {
        let hn_critical = (self.resist_dry - self.drive) / self.pore_slope;
        hn_critical / self.cos_ipc - self.depth
    }

    /// Critical elevation clamped to the physical window [-h, 0], as
    /// reported in prevision results.
    pub fn critical_elevation_reported(&self) -> f64 {
        self.critical_elevation().clamp(-self.depth, 0.0)
    }

    /// Horizontal projection factor cos(beta1) applied to displacement
    /// and velocity outputs.
    pub fn horizontal_projection(&self) -> f64 {
        self.cos_beta1
    }
}
