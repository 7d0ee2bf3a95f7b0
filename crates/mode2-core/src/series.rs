//! Monthly data series and the per-request dataset handed over by the
//! storage collaborator.
//!
//! Every imported series covers exactly one annual cycle: 12 values,
//! month indices 0..11. Values are validated to be finite on construction;
//! domain conventions (rainfall mm >= 0, water table m <= 0, displacement
//! cm non-decreasing) are enforced where the series is consumed.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of samples in every imported series.
pub const MONTHS_PER_YEAR: usize = 12;

/// The named series a dataset can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesName {
    /// Rainfall, mm per month.
    Pioggia,
    /// Water-table elevation, m from ground surface, negative downward.
    Falda,
    /// Measured cumulative displacement, cm.
    Spostamento,
}

impl SeriesName {
    pub fn label_it(self) -> &'static str {
        match self {
            SeriesName::Pioggia => "pioggia",
            SeriesName::Falda => "falda",
            SeriesName::Spostamento => "spostamento",
        }
    }

    pub fn label_en(self) -> &'static str {
        match self {
            SeriesName::Pioggia => "rainfall",
            SeriesName::Falda => "water table",
            SeriesName::Spostamento => "displacement",
        }
    }
}

/// One annual cycle of monthly values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries([f64; MONTHS_PER_YEAR]);

impl MonthlySeries {
    /// Create a series, rejecting NaN and infinite values.
    pub fn new(values: [f64; MONTHS_PER_YEAR]) -> Result<Self, EngineError> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidParameter {
                name: "series",
                reason: "contains non-finite values".to_string(),
            });
        }
        Ok(Self(values))
    }

    /// Create a series from a slice, validating length and finiteness.
    pub fn from_slice(values: &[f64]) -> Result<Self, EngineError> {
        let arr: [f64; MONTHS_PER_YEAR] =
            values
                .try_into()
                .map_err(|_| EngineError::InvalidParameter {
                    name: "series",
                    reason: format!("expected {} values, got {}", MONTHS_PER_YEAR, values.len()),
                })?;
        Self::new(arr)
    }

    pub fn values(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl std::ops::Index<usize> for MonthlySeries {
    type Output = f64;

    fn index(&self, month: usize) -> &f64 {
        &self.0[month]
    }
}

/// The named series imported for one dataset.
///
/// Retrieval and persistence are the storage collaborator's concern; the
/// engine only checks presence and fails with `DATA_NOT_FOUND` when a
/// required series is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub pioggia: Option<MonthlySeries>,
    pub falda: Option<MonthlySeries>,
    pub spostamento: Option<MonthlySeries>,
}

impl Dataset {
    pub fn get(&self, name: SeriesName) -> Option<&MonthlySeries> {
        match name {
            SeriesName::Pioggia => self.pioggia.as_ref(),
            SeriesName::Falda => self.falda.as_ref(),
            SeriesName::Spostamento => self.spostamento.as_ref(),
        }
    }

    /// Fetch a required series or fail with `DATA_NOT_FOUND`.
    pub fn require(&self, name: SeriesName) -> Result<&MonthlySeries, EngineError> {
        self.get(name).ok_or(EngineError::SeriesMissing(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn ramp() -> [f64; 12] {
        std::array::from_fn(|i| i as f64)
    }

    #[test]
    fn valid_series() {
        let s = MonthlySeries::new(ramp()).unwrap();
        assert_eq!(s[0], 0.0);
        assert_eq!(s[11], 11.0);
        assert_eq!(s.min(), 0.0);
        assert_eq!(s.max(), 11.0);
    }

    #[test]
    fn rejects_nan() {
        let mut v = ramp();
        v[4] = f64::NAN;
        assert!(MonthlySeries::new(v).is_err());
    }

    #[test]
    fn rejects_infinity() {
        let mut v = ramp();
        v[7] = f64::INFINITY;
        assert!(MonthlySeries::new(v).is_err());
    }

    #[test]
    fn from_slice_wrong_length() {
        let err = MonthlySeries::from_slice(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn from_slice_roundtrip() {
        let s = MonthlySeries::from_slice(&ramp()).unwrap();
        assert_eq!(s.values(), &ramp());
    }

    #[test]
    fn dataset_require_missing_is_data_not_found() {
        let ds = Dataset::default();
        let err = ds.require(SeriesName::Falda).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataNotFound);
    }

    #[test]
    fn dataset_require_present() {
        let ds = Dataset {
            pioggia: Some(MonthlySeries::new(ramp()).unwrap()),
            ..Dataset::default()
        };
        assert!(ds.require(SeriesName::Pioggia).is_ok());
        assert!(ds.get(SeriesName::Spostamento).is_none());
    }
}
