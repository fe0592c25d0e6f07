//! Engine status handler

use axum::{extract::State, Json};

use crate::model::EngineStatus;
use crate::AppState;

/// Fit metadata plus inference statistics
pub async fn get(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.pipeline.status())
}
