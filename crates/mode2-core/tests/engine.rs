//! End-to-end scenarios over the public engine API.

use approx::assert_relative_eq;
use mode2_core::{
    calibrate, prevision, AnalysisSettings, CalibrationMode, CalibrationRequest,
    CalibrationResult, Dataset, DisplacementUnit, EngineError, ErrorCode, Geometry,
    GeotechnicalParams, ModelParams, MonthlySeries, PrevisionRequest, PrevisionType,
};

/// Documented real rainfall series [mm].
const PIOGGIA: [f64; 12] = [
    6.13599536,
    161.902106,
    140.762227,
    29.5641577,
    156.236345,
    146.566066,
    95.4563347,
    98.3502668,
    44.6017347,
    17.4273983,
    2.55718497,
    5.29880969,
];

fn geometry() -> Geometry {
    Geometry {
        l1: 409.71,
        l2: 314.46,
        h: 20.31,
        beta1: 5.18,
        beta2: 11.66,
        i_pc: 7.99,
    }
}

fn geotechnical() -> GeotechnicalParams {
    GeotechnicalParams {
        gamma_sat: 20.5,
        gamma_w: 10.0,
        fi: 13.8,
        c: 0.0,
        mu: 4.44e10,
        fi_interface: 23.0,
    }
}

fn model() -> ModelParams {
    ModelParams {
        hs: 161.902106,
        kt: 2.9,
        an: 0.27,
        ho: 0.0,
        hmin: -1.773,
    }
}

/// Model of a wetter year whose water table oscillates across the
/// stability threshold, peaking near the documented falda maximum.
fn wet_model() -> ModelParams {
    ModelParams { an: 1.0, ..model() }
}

/// Water table produced by a given parameter set, used as the measured
/// series in the end-to-end scenarios.
fn synthetic_falda(params: ModelParams) -> MonthlySeries {
    let dataset = Dataset {
        pioggia: Some(MonthlySeries::new(PIOGGIA).unwrap()),
        falda: Some(MonthlySeries::new([-1.0; 12]).unwrap()),
        spostamento: None,
    };
    let request = CalibrationRequest {
        mode: CalibrationMode::Manual { params },
        geometry: geometry(),
    };
    calibrate(&dataset, &request).unwrap().water_table_calculated
}

fn full_dataset() -> Dataset {
    Dataset {
        pioggia: Some(MonthlySeries::new(PIOGGIA).unwrap()),
        falda: Some(synthetic_falda(model())),
        spostamento: None,
    }
}

fn prevision_dataset() -> Dataset {
    Dataset {
        falda: Some(synthetic_falda(wet_model())),
        ..full_dataset()
    }
}

fn prevision_request(prevision_type: PrevisionType) -> PrevisionRequest {
    PrevisionRequest {
        prevision_type,
        geometry: geometry(),
        geotechnical: geotechnical(),
        model: wet_model(),
        settings: AnalysisSettings::default(),
    }
}

#[test]
fn automatic_calibration_recovers_the_documented_parameters() {
    let dataset = full_dataset();
    let request = CalibrationRequest {
        mode: CalibrationMode::Automatic,
        geometry: geometry(),
    };
    let result = calibrate(&dataset, &request).unwrap();

    assert!(result.diagnostics.converged);
    assert!(result.diagnostics.sse < 1e-6, "sse = {}", result.diagnostics.sse);
    assert_relative_eq!(result.params.hs, model().hs, max_relative = 0.01);
    assert_eq!(result.params.ho, 0.0);
    assert_relative_eq!(result.params.hmin, synthetic_falda(model()).min());
    assert_eq!(result.rainfall.values(), &PIOGGIA);
}

#[test]
fn manual_calibration_echoes_the_supplied_parameters() {
    let dataset = full_dataset();
    let request = CalibrationRequest {
        mode: CalibrationMode::Manual { params: model() },
        geometry: geometry(),
    };
    let result = calibrate(&dataset, &request).unwrap();

    assert_eq!(result.params, model());
    // The measured series was generated by these same parameters.
    assert!(result.diagnostics.sse < 1e-18);
    assert_eq!(result.diagnostics.iterations, 0);
}

#[test]
fn standard_prevision_produces_the_result_matrix() {
    let dataset = prevision_dataset();
    let result = prevision(&dataset, &prevision_request(PrevisionType::Standard)).unwrap();

    assert_eq!(result.time.len(), 12);
    assert_eq!(result.displacement_calculated.len(), 12);
    assert_eq!(result.velocity.len(), 12);
    assert_eq!(result.safety_factor.len(), 12);
    assert!(result.displacement_measured.is_none());
    assert!(result.calibrated_viscosity.is_none());

    // The synthetic year crosses the stability threshold: some months
    // fail, some hold, and displacement accumulates monotonically.
    let min_fs = result.safety_factor.iter().copied().fold(f64::INFINITY, f64::min);
    let max_fs = result.safety_factor.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(min_fs < 1.0, "min FS = {min_fs}");
    assert!(max_fs > 1.0, "max FS = {max_fs}");
    for pair in result.displacement_calculated.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    assert!(*result.displacement_calculated.last().unwrap() > 0.0);

    for (v, fs) in result.velocity.iter().zip(&result.safety_factor) {
        if *fs >= 1.0 {
            assert_eq!(*v, 0.0);
        } else {
            // Creep velocity in m/s, a few cm per month at most.
            assert!(*v > 0.0 && *v < 1e-6, "velocity = {v}");
        }
    }

    // Critical water table: one value, repeated, inside the physical window.
    let critical = result.critical_water_table[0];
    assert!(result.critical_water_table.iter().all(|z| *z == critical));
    assert!((-geometry().h..=0.0).contains(&critical));

    assert_eq!(
        result.water_table_calculated.len(),
        result.water_table_measured.len()
    );
}

#[test]
fn best_fit_viscosity_recovers_the_standard_viscosity() {
    let dataset = prevision_dataset();
    // Standard prevision in centimetres plays the role of the measured
    // displacement record.
    let standard = prevision(&dataset, &prevision_request(PrevisionType::Standard)).unwrap();
    let measured_cm = MonthlySeries::from_slice(&standard.displacement_calculated).unwrap();

    let with_measurements = Dataset {
        spostamento: Some(measured_cm),
        ..dataset
    };
    let result = prevision(
        &with_measurements,
        &prevision_request(PrevisionType::BestFitViscosity),
    )
    .unwrap();

    let calibrated = result.calibrated_viscosity.unwrap();
    assert_eq!(calibrated.unit, "kN*month/m2");
    assert_relative_eq!(calibrated.mu, geotechnical().mu, max_relative = 1e-3);
    for (fitted, reference) in result
        .displacement_calculated
        .iter()
        .zip(&standard.displacement_calculated)
    {
        assert_relative_eq!(fitted, reference, max_relative = 1e-2, epsilon = 1e-9);
    }
    assert!(result.displacement_measured.is_some());
}

#[test]
fn best_fit_viscosity_without_measurements_is_a_prevision_failure() {
    let dataset = prevision_dataset();
    let err = prevision(&dataset, &prevision_request(PrevisionType::BestFitViscosity))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PrevisionFailed);
    assert_eq!(err.bilingual().it, "Errore durante il calcolo della previsione.");
}

#[test]
fn missing_water_table_is_data_not_found() {
    let dataset = Dataset {
        pioggia: Some(MonthlySeries::new(PIOGGIA).unwrap()),
        falda: None,
        spostamento: None,
    };
    let request = CalibrationRequest {
        mode: CalibrationMode::Automatic,
        geometry: geometry(),
    };
    let err = calibrate(&dataset, &request).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DataNotFound);
    assert_eq!(
        err.bilingual().it,
        "Dati di falda non trovati per questo dataset."
    );
    assert_eq!(
        err.bilingual().en,
        "Water table data not found for this dataset."
    );
}

#[test]
fn missing_rainfall_is_data_not_found_for_prevision() {
    let dataset = Dataset {
        pioggia: None,
        falda: Some(synthetic_falda(wet_model())),
        spostamento: None,
    };
    let err = prevision(&dataset, &prevision_request(PrevisionType::Standard)).unwrap_err();
    assert!(matches!(err, EngineError::SeriesMissing(_)));
    assert_eq!(err.code(), ErrorCode::DataNotFound);
}

#[test]
fn collapsed_geometry_is_a_validation_error() {
    let dataset = prevision_dataset();
    let mut request = prevision_request(PrevisionType::Standard);
    request.geometry.l1 = 0.0;
    request.geometry.l2 = 0.0;
    let err = prevision(&dataset, &request).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[test]
fn frictionless_soil_is_a_prevision_failure() {
    let dataset = prevision_dataset();
    let mut request = prevision_request(PrevisionType::Standard);
    request.geotechnical.fi = 0.0;
    request.geotechnical.c = 25.0;
    let err = prevision(&dataset, &request).unwrap_err();
    assert_eq!(err.code(), ErrorCode::PrevisionFailed);
    let payload = err.to_payload();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["error_code"], "PREVISION_FAILED");
    assert_eq!(json["success"], false);
}

#[test]
fn displacement_unit_scales_the_outputs() {
    let dataset = prevision_dataset();
    let mut request = prevision_request(PrevisionType::Standard);
    request.settings.displacement_unit = DisplacementUnit::Meters;
    let metres = prevision(&dataset, &request).unwrap();
    request.settings.displacement_unit = DisplacementUnit::Millimeters;
    let millimetres = prevision(&dataset, &request).unwrap();

    for (m, mm) in metres
        .displacement_calculated
        .iter()
        .zip(&millimetres.displacement_calculated)
    {
        assert_relative_eq!(*mm, m * 1000.0, max_relative = 1e-12, epsilon = 1e-15);
    }
    // Velocity is m/s and water tables are metres regardless of the unit.
    assert_eq!(metres.velocity, millimetres.velocity);
    assert_eq!(metres.water_table_calculated, millimetres.water_table_calculated);
}

#[test]
fn calibration_result_serializes_for_the_service() {
    let dataset = full_dataset();
    let request = CalibrationRequest {
        mode: CalibrationMode::Automatic,
        geometry: geometry(),
    };
    let result: CalibrationResult = calibrate(&dataset, &request).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["params"]["hs"].is_f64());
    assert_eq!(json["water_table_calculated"].as_array().unwrap().len(), 12);
    assert_eq!(json["rainfall"].as_array().unwrap().len(), 12);
    assert!(json["diagnostics"]["converged"].as_bool().unwrap());
}
