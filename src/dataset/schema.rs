//! Dataset Schema - Centralized Column Definition
//!
//! **This file controls the dataset schema**
//!
//! ## Rules:
//! 1. Add column → increment SCHEMA_VERSION
//! 2. Change order → increment SCHEMA_VERSION
//! 3. Remove column → increment SCHEMA_VERSION
//!
//! The fitted pipeline records the schema hash at fit time, so a stale
//! artifact can be detected instead of silently mis-mapping columns.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current schema version
/// MUST be incremented when the layout changes
pub const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// COLUMN LAYOUT (Authoritative source)
// ============================================================================

/// Supervised target column, coercible to {0, 1}
pub const LABEL_COLUMN: &str = "failure_within_30_days";

/// Numeric feature columns in the order they enter the feature vector
pub const NUMERIC_FEATURES: &[&str] = &[
    "total_mileage_km",   // 0: Odometer reading
    "avg_daily_km",       // 1: Average kilometres driven per day
    "oil_change_count",   // 2: Lifetime oil changes
    "brake_change_count", // 3: Lifetime brake pad replacements
    "days_since_service", // 4: Days since the last workshop visit
    "avg_temperature_c",  // 5: Average ambient operating temperature
];

/// Categorical feature columns, one-hot encoded after the numeric block
pub const CATEGORICAL_FEATURES: &[&str] = &[
    "vehicle_type",  // car, truck, van, ...
    "road_type",     // city, highway, mixed, ...
    "engine_noise",  // normal, abnormal, ...
    "vibration",     // low, medium, high
    "warning_light", // on, off
];

pub const NUMERIC_COUNT: usize = 6;
pub const CATEGORICAL_COUNT: usize = 5;

/// Total feature columns (label excluded)
pub const FEATURE_COUNT: usize = NUMERIC_COUNT + CATEGORICAL_COUNT;

/// Iterate all feature column names in schema order (numeric first)
pub fn feature_columns() -> impl Iterator<Item = &'static str> {
    NUMERIC_FEATURES
        .iter()
        .chain(CATEGORICAL_FEATURES.iter())
        .copied()
}

/// All columns a dataset file must carry (features + label)
pub fn dataset_columns() -> impl Iterator<Item = &'static str> {
    feature_columns().chain(std::iter::once(LABEL_COLUMN))
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered column names.
/// Used to stamp fitted pipelines with the schema they were trained against.
pub fn schema_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[SCHEMA_VERSION]);
    for name in dataset_columns() {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

// ============================================================================
// SCHEMA INFO
// ============================================================================

/// Complete schema description for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: u8,
    pub hash: u32,
    pub label_column: String,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
}

impl SchemaInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: schema_hash(),
            label_column: LABEL_COLUMN.to_string(),
            numeric_features: NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect(),
            categorical_features: CATEGORICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// COLUMN LOOKUP
// ============================================================================

/// Index of a numeric feature within the numeric block
pub fn numeric_index(name: &str) -> Option<usize> {
    NUMERIC_FEATURES.iter().position(|&n| n == name)
}

/// Index of a categorical feature within the categorical block
pub fn categorical_index(name: &str) -> Option<usize> {
    CATEGORICAL_FEATURES.iter().position(|&n| n == name)
}

/// Whether a column name belongs to the fixed schema (label included)
pub fn is_schema_column(name: &str) -> bool {
    dataset_columns().any(|c| c == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(NUMERIC_FEATURES.len(), NUMERIC_COUNT);
        assert_eq!(CATEGORICAL_FEATURES.len(), CATEGORICAL_COUNT);
        assert_eq!(feature_columns().count(), FEATURE_COUNT);
        assert_eq!(dataset_columns().count(), FEATURE_COUNT + 1);
    }

    #[test]
    fn test_schema_hash_consistency() {
        assert_eq!(schema_hash(), schema_hash());
        assert_ne!(schema_hash(), 0);
    }

    #[test]
    fn test_column_lookup() {
        assert_eq!(numeric_index("total_mileage_km"), Some(0));
        assert_eq!(numeric_index("avg_temperature_c"), Some(5));
        assert_eq!(categorical_index("warning_light"), Some(4));
        assert_eq!(numeric_index("warning_light"), None);
        assert!(is_schema_column(LABEL_COLUMN));
        assert!(!is_schema_column("horsepower"));
    }

    #[test]
    fn test_schema_info() {
        let info = SchemaInfo::current();
        assert_eq!(info.version, SCHEMA_VERSION);
        assert_eq!(info.numeric_features.len(), NUMERIC_COUNT);
        assert_eq!(info.categorical_features.len(), CATEGORICAL_COUNT);
    }
}
