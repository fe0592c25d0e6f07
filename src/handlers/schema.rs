//! Schema handler - feature layout and allowed categorical values
//!
//! The presentation layer populates its form selectors from this endpoint
//! instead of re-reading the training data.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::dataset::SchemaInfo;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FeatureVocabulary {
    pub feature: &'static str,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub schema: SchemaInfo,
    /// Allowed values per categorical feature, as seen at fit time
    pub vocabularies: Vec<FeatureVocabulary>,
}

pub async fn get(State(state): State<AppState>) -> Json<SchemaResponse> {
    let vocabularies = state
        .pipeline
        .vocabularies()
        .map(|(feature, values)| FeatureVocabulary {
            feature,
            values: values.to_vec(),
        })
        .collect();

    Json(SchemaResponse {
        schema: SchemaInfo::current(),
        vocabularies,
    })
}
