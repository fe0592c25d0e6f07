//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::model::ForestParams;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the training dataset CSV
    pub dataset_path: PathBuf,

    /// Server port
    pub port: u16,

    /// Trees in the forest
    pub n_trees: usize,

    /// Per-tree depth limit
    pub max_depth: usize,

    /// Forest random seed
    pub seed: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            dataset_path: env::var("DATASET_PATH")
                .unwrap_or_else(|_| "data/vehicle_failure_dataset.csv".to_string())
                .into(),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            n_trees: env::var("FOREST_TREES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(200),

            max_depth: env::var("FOREST_MAX_DEPTH")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(12),

            seed: env::var("FOREST_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(42),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Forest hyperparameters for the startup fit
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: 2,
            seed: self.seed,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
