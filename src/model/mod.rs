//! Prediction pipeline: records, preprocessing, forest, advisory

pub mod advisory;
pub mod forest;
pub mod pipeline;
pub mod preprocess;
pub mod record;
pub mod tree;

pub use advisory::Advisory;
pub use forest::{ForestParams, RandomForest};
pub use pipeline::{EngineStatus, Prediction, PredictionPipeline, PipelineMetadata};
pub use preprocess::Preprocessor;
pub use record::VehicleRecord;

/// Model-layer errors. Validation problems carry the offending field so the
/// caller sees a schema issue instead of a cryptic numeric failure.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Numeric field '{field}' holds non-finite value {value}")]
    InvalidNumeric { field: String, value: f64 },

    #[error("Categorical field '{field}' is empty")]
    EmptyCategorical { field: String },

    #[error("Design matrix has {rows} rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("Forest requires at least one tree")]
    NoTrees,

    #[error("Cannot fit a pipeline on an empty dataset")]
    EmptyDataset,
}

impl ModelError {
    /// Whether this error is attributable to the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidNumeric { .. } | ModelError::EmptyCategorical { .. }
        )
    }
}
