//! Prediction pipeline: preprocessing + forest behind one fit/predict seam.
//!
//! Fit happens once at process start. The resulting pipeline holds frozen
//! scaling statistics, a frozen category vocabulary, and a frozen forest, so
//! it is safe to share read-only across concurrent inference requests. The
//! only mutable state is a pair of counters feeding the status endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::schema::{self, SCHEMA_VERSION};
use crate::dataset::Dataset;

use super::forest::{ForestParams, RandomForest};
use super::preprocess::Preprocessor;
use super::record::VehicleRecord;
use super::ModelError;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Frozen facts about one fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub n_trees: usize,
    pub seed: u64,
    pub feature_width: usize,
    pub schema_version: u8,
    pub schema_hash: u32,
}

/// Inference output for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// 1 = failure within 30 days
    pub label: u8,
    pub probability_ok: f64,
    pub probability_failure: f64,
}

/// Engine status for the UI / status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub n_trees: usize,
    pub seed: u64,
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug)]
pub struct PredictionPipeline {
    preprocessor: Preprocessor,
    forest: RandomForest,
    metadata: PipelineMetadata,

    // Latency stats
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl PredictionPipeline {
    /// Fit once on the cleaned dataset. Numeric scaling statistics, the
    /// category vocabulary, and the forest are all learned here and never
    /// change afterwards.
    pub fn fit(dataset: &Dataset, params: ForestParams) -> Result<Self, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        for record in &dataset.records {
            record.validate()?;
        }

        let start = Instant::now();
        let preprocessor = Preprocessor::fit(&dataset.records);
        let matrix = preprocessor.transform_matrix(&dataset.records);
        let forest = RandomForest::fit(&matrix, &dataset.labels, params)?;

        let metadata = PipelineMetadata {
            trained_at: Utc::now(),
            training_rows: dataset.len(),
            n_trees: forest.n_trees(),
            seed: params.seed,
            feature_width: preprocessor.output_width(),
            schema_version: SCHEMA_VERSION,
            schema_hash: schema::schema_hash(),
        };

        tracing::info!(
            rows = metadata.training_rows,
            trees = metadata.n_trees,
            width = metadata.feature_width,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pipeline fitted"
        );

        Ok(Self {
            preprocessor,
            forest,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Full inference: validate, transform, vote. Tracks latency stats.
    pub fn predict(&self, record: &VehicleRecord) -> Result<Prediction, ModelError> {
        let start = Instant::now();
        record.validate()?;

        let features = self.preprocessor.transform(record);
        let proba = self.forest.predict_proba(&features);
        let label = u8::from(proba[1] > proba[0]);

        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            label,
            probability_ok: proba[0],
            probability_failure: proba[1],
        })
    }

    /// Binary label only.
    pub fn predict_label(&self, record: &VehicleRecord) -> Result<u8, ModelError> {
        Ok(self.predict(record)?.label)
    }

    /// `[p_ok, p_failure]`, summing to 1.0.
    pub fn predict_proba(&self, record: &VehicleRecord) -> Result<[f64; 2], ModelError> {
        let prediction = self.predict(record)?;
        Ok([prediction.probability_ok, prediction.probability_failure])
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    /// Allowed values per categorical feature, as learned at fit time.
    /// The presentation layer populates its selectors from this, instead of
    /// re-reading the training data.
    pub fn vocabularies(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.preprocessor.encoder().vocabularies()
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f64 / count as f64) / 1000.0
        } else {
            0.0
        };

        EngineStatus {
            model_loaded: true,
            trained_at: self.metadata.trained_at,
            training_rows: self.metadata.training_rows,
            n_trees: self.metadata.n_trees,
            seed: self.metadata.seed,
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
