//! Vehicle Record - one observation, from a dataset row or a live request
//!
//! Field names match the dataset schema exactly, so the same struct
//! deserializes from a CSV row and from the prediction request body.
//! `deny_unknown_fields` makes an extra column a request error instead of
//! a silent drop.

use serde::{Deserialize, Serialize};

use crate::dataset::schema::{CATEGORICAL_COUNT, CATEGORICAL_FEATURES, NUMERIC_COUNT, NUMERIC_FEATURES};
use super::ModelError;

/// One vehicle observation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleRecord {
    // Numeric attributes
    pub total_mileage_km: f64,
    pub avg_daily_km: f64,
    pub oil_change_count: f64,
    pub brake_change_count: f64,
    pub days_since_service: f64,
    pub avg_temperature_c: f64,

    // Categorical attributes
    pub vehicle_type: String,
    pub road_type: String,
    pub engine_noise: String,
    pub vibration: String,
    pub warning_light: String,
}

impl VehicleRecord {
    /// Numeric values in schema order (matches `NUMERIC_FEATURES`)
    pub fn numeric_values(&self) -> [f64; NUMERIC_COUNT] {
        [
            self.total_mileage_km,
            self.avg_daily_km,
            self.oil_change_count,
            self.brake_change_count,
            self.days_since_service,
            self.avg_temperature_c,
        ]
    }

    /// Categorical values in schema order (matches `CATEGORICAL_FEATURES`)
    pub fn categorical_values(&self) -> [&str; CATEGORICAL_COUNT] {
        [
            &self.vehicle_type,
            &self.road_type,
            &self.engine_noise,
            &self.vibration,
            &self.warning_light,
        ]
    }

    /// Reject records that would poison the numeric path downstream.
    /// Errors name the offending field so the caller sees a schema problem,
    /// not a cryptic NaN somewhere inside a tree split.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in NUMERIC_FEATURES.iter().zip(self.numeric_values()) {
            if !value.is_finite() {
                return Err(ModelError::InvalidNumeric {
                    field: name.to_string(),
                    value,
                });
            }
        }
        for (name, value) in CATEGORICAL_FEATURES.iter().zip(self.categorical_values()) {
            if value.trim().is_empty() {
                return Err(ModelError::EmptyCategorical {
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_record() -> VehicleRecord {
        VehicleRecord {
            total_mileage_km: 50_000.0,
            avg_daily_km: 50.0,
            oil_change_count: 5.0,
            brake_change_count: 1.0,
            days_since_service: 100.0,
            avg_temperature_c: 25.0,
            vehicle_type: "car".to_string(),
            road_type: "city".to_string(),
            engine_noise: "normal".to_string(),
            vibration: "low".to_string(),
            warning_light: "off".to_string(),
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_non_finite_numeric_rejected() {
        let mut record = sample_record();
        record.days_since_service = f64::NAN;
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("days_since_service"));
    }

    #[test]
    fn test_empty_categorical_rejected() {
        let mut record = sample_record();
        record.engine_noise = "  ".to_string();
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("engine_noise"));
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let json = serde_json::json!({
            "total_mileage_km": 50000.0,
            "avg_daily_km": 50.0,
            // oil_change_count missing
            "brake_change_count": 1.0,
            "days_since_service": 100.0,
            "avg_temperature_c": 25.0,
            "vehicle_type": "car",
            "road_type": "city",
            "engine_noise": "normal",
            "vibration": "low",
            "warning_light": "off"
        });
        let result: Result<VehicleRecord, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut json = serde_json::to_value(sample_record()).unwrap();
        json["horsepower"] = serde_json::json!(120);
        let result: Result<VehicleRecord, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_order_matches_layout() {
        let record = sample_record();
        assert_eq!(record.numeric_values()[0], record.total_mileage_km);
        assert_eq!(record.categorical_values()[4], "off");
    }
}
