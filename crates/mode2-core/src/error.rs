//! Error taxonomy and bilingual boundary messages.
//!
//! The engine never partially succeeds: any failure aborts the operation
//! and surfaces as an [`EngineError`] carrying a machine-readable
//! [`ErrorCode`]. Human-readable Italian/English text is a presentation
//! concern, resolved at the boundary via [`EngineError::bilingual`].

use serde::Serialize;
use thiserror::Error;

use crate::series::SeriesName;

/// Machine-readable error codes exposed to the surrounding service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DataNotFound,
    ValidationError,
    CalibrationFailed,
    PrevisionFailed,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{} data not found for this dataset", .0.label_en())]
    SeriesMissing(SeriesName),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("degenerate slope geometry: {0}")]
    DegenerateGeometry(String),

    #[error("calibration did not converge within {iterations} iterations")]
    CalibrationDiverged { iterations: usize },

    #[error("calibration produced out-of-domain parameters: {0}")]
    CalibrationOutOfBounds(String),

    #[error("measured displacement is required for best-fit viscosity")]
    MissingMeasuredDisplacement,

    #[error("viscosity search failed to bracket a solution: {0}")]
    ViscosityBracket(String),

    #[error("non-finite value produced in {0}")]
    NonFinite(&'static str),
}

impl EngineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::SeriesMissing(_) => ErrorCode::DataNotFound,
            EngineError::InvalidParameter { .. } => ErrorCode::ValidationError,
            EngineError::DegenerateGeometry(_) => ErrorCode::PrevisionFailed,
            EngineError::CalibrationDiverged { .. } | EngineError::CalibrationOutOfBounds(_) => {
                ErrorCode::CalibrationFailed
            }
            EngineError::MissingMeasuredDisplacement
            | EngineError::ViscosityBracket(_)
            | EngineError::NonFinite(_) => ErrorCode::PrevisionFailed,
        }
    }

    /// Resolve the code to the locale-keyed message pair used by the
    /// original service, with the English detail attached.
    pub fn bilingual(&self) -> BilingualMessage {
        let (it, en) = match self {
            EngineError::SeriesMissing(name) => (
                format!(
                    "Dati di {} non trovati per questo dataset.",
                    name.label_it()
                ),
                format!(
                    "{} data not found for this dataset.",
                    capitalize(name.label_en())
                ),
            ),
            EngineError::InvalidParameter { name, .. } => (
                format!("Parametro non valido: {name}."),
                format!("Invalid parameter: {name}."),
            ),
            EngineError::CalibrationDiverged { .. } | EngineError::CalibrationOutOfBounds(_) => (
                "Errore durante la calibrazione automatica.".to_string(),
                "Error during automatic calibration.".to_string(),
            ),
            EngineError::DegenerateGeometry(_)
            | EngineError::MissingMeasuredDisplacement
            | EngineError::ViscosityBracket(_)
            | EngineError::NonFinite(_) => (
                "Errore durante il calcolo della previsione.".to_string(),
                "Error during prevision calculation.".to_string(),
            ),
        };
        BilingualMessage { it, en }
    }

    /// Assemble the structured failure payload returned to the service.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            success: false,
            error_code: self.code(),
            errors: vec![self.bilingual()],
            details: Some(self.to_string()),
        }
    }
}

/// Locale-keyed message pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilingualMessage {
    pub it: String,
    pub en: String,
}

/// JSON-shaped failure response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub success: bool,
    pub error_code: ErrorCode,
    pub errors: Vec<BilingualMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_series_message_matches_service_wording() {
        let err = EngineError::SeriesMissing(SeriesName::Pioggia);
        let msg = err.bilingual();
        assert_eq!(msg.it, "Dati di pioggia non trovati per questo dataset.");
        assert_eq!(msg.en, "Rainfall data not found for this dataset.");
        assert_eq!(err.code(), ErrorCode::DataNotFound);
    }

    #[test]
    fn falda_label_capitalized_in_english() {
        let msg = EngineError::SeriesMissing(SeriesName::Falda).bilingual();
        assert_eq!(msg.en, "Water table data not found for this dataset.");
        assert_eq!(msg.it, "Dati di falda non trovati per questo dataset.");
    }

    #[test]
    fn calibration_errors_share_the_calibration_message() {
        let msg = EngineError::CalibrationDiverged { iterations: 400 }.bilingual();
        assert_eq!(msg.it, "Errore durante la calibrazione automatica.");
        assert_eq!(msg.en, "Error during automatic calibration.");
    }

    #[test]
    fn codes_cover_taxonomy() {
        assert_eq!(
            EngineError::InvalidParameter {
                name: "hs",
                reason: "must be > 0".to_string()
            }
            .code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            EngineError::MissingMeasuredDisplacement.code(),
            ErrorCode::PrevisionFailed
        );
        assert_eq!(
            EngineError::DegenerateGeometry("zero driving force".to_string()).code(),
            ErrorCode::PrevisionFailed
        );
    }

    #[test]
    fn payload_serializes_with_screaming_code() {
        let payload = EngineError::SeriesMissing(SeriesName::Spostamento).to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["error_code"], "DATA_NOT_FOUND");
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["en"], "Displacement data not found for this dataset.");
    }
}
