//! Calibrate / prevision orchestrators.
//!
//! The two public operations of the engine. Both are whole-operation:
//! any validation or numeric failure aborts and surfaces as an
//! [`EngineError`], never a partial result. The caller (the surrounding
//! service) supplies a [`Dataset`] of imported series and a request
//! struct; everything else is computed here.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::creep::{self, TimeGrid};
use crate::error::EngineError;
use crate::harmonics::HarmonicSeries;
use crate::metrics;
use crate::series::{Dataset, MonthlySeries, SeriesName, MONTHS_PER_YEAR};
use crate::stability::{ForceBalance, Geometry, GeotechnicalParams};
use crate::watertable::{self, CalibrationMode, FitDiagnostics, ModelParams};

/// Unit of the displacement (and velocity) values in a prevision result.
/// Measured displacement is always imported in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplacementUnit {
    Millimeters,
    Centimeters,
    Meters,
}

impl DisplacementUnit {
    /// Output units per metre.
    pub fn per_metre(self) -> f64 {
        match self {
            DisplacementUnit::Millimeters => 1000.0,
            DisplacementUnit::Centimeters => 100.0,
            DisplacementUnit::Meters => 1.0,
        }
    }
}

/// Tunable knobs of a prevision run. All fields default to the values
/// the original desktop analysis uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Requested harmonic count for the water-table extension; values
    /// beyond the Nyquist limit are capped.
    pub num_harmonics: usize,
    /// Seconds of elapsed time per monthly step.
    pub seconds_per_step: f64,
    /// Sub-monthly integration points per step.
    pub substeps: usize,
    pub displacement_unit: DisplacementUnit,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            num_harmonics: 100,
            seconds_per_step: 2_592_000.0,
            substeps: 30,
            displacement_unit: DisplacementUnit::Centimeters,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.num_harmonics == 0 {
            return Err(EngineError::InvalidParameter {
                name: "num_harmonics",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.seconds_per_step.is_finite() || self.seconds_per_step <= 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "seconds_per_step",
                reason: "must be a positive number".to_string(),
            });
        }
        if self.substeps == 0 {
            return Err(EngineError::InvalidParameter {
                name: "substeps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Request for the calibration operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRequest {
    #[serde(flatten)]
    pub mode: CalibrationMode,
    pub geometry: Geometry,
}

/// Outcome of a calibration: the resolved parameters, the simulated
/// water table and echoes of the inputs.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationResult {
    pub params: ModelParams,
    pub water_table_calculated: MonthlySeries,
    pub water_table_measured: MonthlySeries,
    pub rainfall: MonthlySeries,
    pub diagnostics: FitDiagnostics,
}

/// Which viscosity the prevision integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrevisionType {
    /// Use the viscosity supplied in [`GeotechnicalParams`].
    Standard,
    /// Back-calibrate the viscosity against measured displacement.
    BestFitViscosity,
}

/// Request for the prevision operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrevisionRequest {
    pub prevision_type: PrevisionType,
    pub geometry: Geometry,
    pub geotechnical: GeotechnicalParams,
    pub model: ModelParams,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

/// Viscosity resolved by the best-fit prevision.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalibratedViscosity {
    pub mu: f64,
    pub unit: &'static str,
}

/// Outcome of a prevision: one value per monthly node for every curve of
/// the original result matrix. Displacement and velocity are horizontal
/// (projected by cos(beta1)); displacement is in the requested unit,
/// velocity always in m/s, water-table values in metres below ground.
#[derive(Debug, Clone, Serialize)]
pub struct PrevisionResult {
    /// Month offsets 0..11.
    pub time: Vec<f64>,
    pub displacement_calculated: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_measured: Option<Vec<f64>>,
    /// Horizontal velocity [m/s]; the unit setting applies to
    /// displacement only.
    pub velocity: Vec<f64>,
    pub safety_factor: Vec<f64>,
    /// Critical water-table elevation, repeated at every node.
    pub critical_water_table: Vec<f64>,
    pub water_table_calculated: Vec<f64>,
    pub water_table_measured: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibrated_viscosity: Option<CalibratedViscosity>,
}

/// Calibrate the water-table response model for one dataset.
///
/// Requires the rainfall and water-table series. Automatic mode runs the
/// Best-Fit search; manual mode validates the supplied parameters and
/// reports their residual against the measured series.
pub fn calibrate(
    dataset: &Dataset,
    request: &CalibrationRequest,
) -> Result<CalibrationResult, EngineError> {
    let rainfall = dataset.require(SeriesName::Pioggia)?;
    let measured = dataset.require(SeriesName::Falda)?;
    request.geometry.validate()?;

    let alpha = request.geometry.i_pc;
    let (params, diagnostics) = match &request.mode {
        CalibrationMode::Automatic => watertable::best_fit(rainfall, measured, alpha)?,
        CalibrationMode::Manual { params } => {
            params.validate()?;
            let simulated = watertable::simulate(rainfall, params, alpha)?;
            let diagnostics = FitDiagnostics {
                sse: metrics::sse(measured.values(), simulated.values()),
                rmse: metrics::rmse(measured.values(), simulated.values()),
                iterations: 0,
                converged: true,
            };
            (*params, diagnostics)
        }
    };

    let calculated = watertable::simulate(rainfall, &params, alpha)?;

    info!(
        hs = params.hs,
        kt = params.kt,
        an = params.an,
        rmse = diagnostics.rmse,
        "calibration finished"
    );

    Ok(CalibrationResult {
        params,
        water_table_calculated: calculated,
        water_table_measured: *measured,
        rainfall: *rainfall,
        diagnostics,
    })
}

/// Forecast displacement, velocity and safety factor for one dataset.
///
/// Requires rainfall and water table; measured displacement is required
/// only for [`PrevisionType::BestFitViscosity`] and is otherwise echoed
/// when present.
pub fn prevision(
    dataset: &Dataset,
    request: &PrevisionRequest,
) -> Result<PrevisionResult, EngineError> {
    let rainfall = dataset.require(SeriesName::Pioggia)?;
    let falda = dataset.require(SeriesName::Falda)?;

    request.geometry.validate()?;
    request.geotechnical.validate()?;
    request.model.validate()?;
    request.settings.validate()?;

    let calculated = watertable::simulate(rainfall, &request.model, request.geometry.i_pc)?;
    let extended = HarmonicSeries::fit(&calculated, request.settings.num_harmonics);

    let balance = ForceBalance::new(&request.geometry, &request.geotechnical)?;
    let grid = TimeGrid {
        steps: MONTHS_PER_YEAR,
        substeps: request.settings.substeps,
        seconds_per_step: request.settings.seconds_per_step,
    };

    let projection = balance.horizontal_projection();
    // Measured displacement is imported in centimetres.
    let measured_m: Option<Vec<f64>> = dataset
        .get(SeriesName::Spostamento)
        .map(|s| s.iter().map(|cm| cm * 0.01).collect());

    let (series, calibrated_viscosity) = match request.prevision_type {
        PrevisionType::Standard => {
            let series = creep::integrate(&balance, &extended, request.geotechnical.mu, &grid)?;
            (series, None)
        }
        PrevisionType::BestFitViscosity => {
            let measured = measured_m
                .as_deref()
                .ok_or(EngineError::MissingMeasuredDisplacement)?;
            let (mu, series) =
                creep::best_fit_viscosity(&balance, &extended, measured, projection, &grid)?;
            (
                series,
                Some(CalibratedViscosity {
                    mu,
                    unit: "kN*month/m2",
                }),
            )
        }
    };

    let scale = projection * request.settings.displacement_unit.per_metre();
    let critical = balance.critical_elevation_reported();

    info!(
        prevision_type = ?request.prevision_type,
        critical_water_table = critical,
        min_safety_factor = series
            .safety_factor
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min),
        "prevision finished"
    );

    Ok(PrevisionResult {
        time: (0..grid.steps).map(|m| m as f64).collect(),
        displacement_calculated: series.displacement.iter().map(|d| d * scale).collect(),
        displacement_measured: measured_m.map(|m| {
            m.iter()
                .map(|d| d * request.settings.displacement_unit.per_metre())
                .collect()
        }),
        velocity: series.velocity.iter().map(|v| v * projection).collect(),
        safety_factor: series.safety_factor,
        critical_water_table: vec![critical; grid.steps],
        water_table_calculated: calculated.values().to_vec(),
        water_table_measured: falda.values().to_vec(),
        calibrated_viscosity,
    })
}
