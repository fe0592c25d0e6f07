//! Prediction handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::model::{Advisory, VehicleRecord};
use crate::{AppResult, AppState};

/// Coarse banding of the failure probability for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    pub fn from_probability(p_failure: f64) -> Self {
        if p_failure >= 0.6 {
            RiskLevel::High
        } else if p_failure >= 0.3 {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// 1 = failure within 30 days
    pub label: u8,
    pub probability_failure: f64,
    pub probability_ok: f64,
    pub risk: RiskLevel,
    pub advisory: Advisory,
}

/// Run one inference on a user-supplied record.
pub async fn predict(
    State(state): State<AppState>,
    Json(record): Json<VehicleRecord>,
) -> AppResult<Json<PredictResponse>> {
    let prediction = state.pipeline.predict(&record)?;
    let advisory = Advisory::for_record(&record);

    tracing::debug!(
        label = prediction.label,
        probability_failure = prediction.probability_failure,
        "inference served"
    );

    Ok(Json(PredictResponse {
        label: prediction.label,
        probability_failure: prediction.probability_failure,
        probability_ok: prediction.probability_ok,
        risk: RiskLevel::from_probability(prediction.probability_failure),
        advisory,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::model::pipeline::tests::{synthetic_fleet, test_params};
    use crate::model::PredictionPipeline;

    fn test_state() -> AppState {
        let pipeline = PredictionPipeline::fit(&synthetic_fleet(100), test_params()).unwrap();
        AppState {
            pipeline: Arc::new(pipeline),
            config: Config::from_env(),
        }
    }

    fn worn_truck() -> VehicleRecord {
        VehicleRecord {
            total_mileage_km: 480_000.0,
            avg_daily_km: 180.0,
            oil_change_count: 2.0,
            brake_change_count: 9.0,
            days_since_service: 900.0,
            avg_temperature_c: 35.0,
            vehicle_type: "truck".to_string(),
            road_type: "highway".to_string(),
            engine_noise: "abnormal".to_string(),
            vibration: "high".to_string(),
            warning_light: "on".to_string(),
        }
    }

    #[tokio::test]
    async fn test_predict_returns_consistent_payload() {
        let state = test_state();
        let response = predict(axum::extract::State(state), Json(worn_truck()))
            .await
            .unwrap();

        let body = response.0;
        assert_eq!(body.label, 1);
        assert!((body.probability_failure + body.probability_ok - 1.0).abs() < 1e-9);
        assert_eq!(body.risk, RiskLevel::from_probability(body.probability_failure));
        assert_eq!(body.advisory.next_service_in_days, 0);
    }

    #[tokio::test]
    async fn test_predict_rejects_invalid_record() {
        let state = test_state();
        let mut record = worn_truck();
        record.avg_daily_km = f64::NAN;

        let result = predict(axum::extract::State(state), Json(record)).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_risk_banding() {
        assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.45), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_probability(0.9), RiskLevel::High);
    }
}
