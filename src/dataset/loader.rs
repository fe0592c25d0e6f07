//! Dataset loading and label cleaning.
//!
//! Reads the maintenance-history CSV, enforces the fixed schema, and
//! produces a feature table plus a fully-defined binary label column.
//! The source file is never mutated.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::model::record::VehicleRecord;

use super::schema::{self, CATEGORICAL_FEATURES, LABEL_COLUMN, NUMERIC_FEATURES};

/// Error type for dataset loading operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to open dataset file: {0}")]
    FileNotFound(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(String),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Dataset has unexpected column '{0}'; schema must match exactly")]
    UnexpectedColumn(String),

    #[error("Row {row}: column '{column}' holds non-numeric value '{value}'")]
    BadNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Label column 'failure_within_30_days' has no valid values; cannot impute")]
    NoValidLabels,

    #[error("Dataset contains no rows")]
    Empty,
}

/// Cleaned training data: one record per row, label fully defined.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<VehicleRecord>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load and clean the dataset at `path`.
///
/// The header must contain exactly the schema columns (order-insensitive).
/// Numeric cells must parse as finite floats; label cells go through
/// [`clean_labels`].
pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::FileNotFound(e.to_string()))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Csv(e.to_string()))?
        .clone();

    let columns = validate_header(&headers)?;

    let numeric_idx: Vec<usize> = NUMERIC_FEATURES.iter().map(|c| columns[*c]).collect();
    let categorical_idx: Vec<usize> = CATEGORICAL_FEATURES.iter().map(|c| columns[*c]).collect();
    let label_idx = columns[LABEL_COLUMN];

    let mut records = Vec::new();
    let mut raw_labels = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = result.map_err(|e| DatasetError::Csv(e.to_string()))?;
        // 1-based, header excluded, so messages point at the file line a user sees
        let row_no = i + 2;

        let mut numeric = [0.0f64; schema::NUMERIC_COUNT];
        for (slot, (&col, name)) in numeric_idx.iter().zip(NUMERIC_FEATURES).enumerate() {
            let cell = row.get(col).unwrap_or("");
            let parsed = cell.parse::<f64>().ok().filter(|v| v.is_finite());
            numeric[slot] = parsed.ok_or_else(|| DatasetError::BadNumeric {
                row: row_no,
                column: name.to_string(),
                value: cell.to_string(),
            })?;
        }

        let cat = |slot: usize| row.get(categorical_idx[slot]).unwrap_or("").to_string();

        records.push(VehicleRecord {
            total_mileage_km: numeric[0],
            avg_daily_km: numeric[1],
            oil_change_count: numeric[2],
            brake_change_count: numeric[3],
            days_since_service: numeric[4],
            avg_temperature_c: numeric[5],
            vehicle_type: cat(0),
            road_type: cat(1),
            engine_noise: cat(2),
            vibration: cat(3),
            warning_light: cat(4),
        });

        raw_labels.push(row.get(label_idx).unwrap_or("").to_string());
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    let labels = clean_labels(&raw_labels)?;

    tracing::info!(
        rows = records.len(),
        positives = labels.iter().filter(|&&l| l == 1).count(),
        "dataset loaded"
    );

    Ok(Dataset { records, labels })
}

/// Map header names to indices, rejecting missing or extra columns.
fn validate_header(headers: &csv::StringRecord) -> Result<HashMap<&'static str, usize>, DatasetError> {
    let mut columns = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        match schema::dataset_columns().find(|&c| c == header) {
            Some(name) => {
                columns.insert(name, i);
            }
            None => return Err(DatasetError::UnexpectedColumn(header.to_string())),
        }
    }
    for name in schema::dataset_columns() {
        if !columns.contains_key(name) {
            return Err(DatasetError::MissingColumn(name.to_string()));
        }
    }
    Ok(columns)
}

/// Coerce raw label cells to a fully-defined binary column.
///
/// A cell is valid when it parses as a finite number rounding to 0 or 1.
/// Invalid cells are imputed with the most frequent valid label; ties
/// resolve to 0 (mode-smallest). Fails when no cell is valid, since the
/// mode would be undefined.
pub fn clean_labels(raw: &[String]) -> Result<Vec<u8>, DatasetError> {
    let parsed: Vec<Option<u8>> = raw.iter().map(|cell| parse_label(cell)).collect();

    let ones = parsed.iter().filter(|l| **l == Some(1)).count();
    let zeros = parsed.iter().filter(|l| **l == Some(0)).count();
    if ones + zeros == 0 {
        return Err(DatasetError::NoValidLabels);
    }
    let mode = if ones > zeros { 1 } else { 0 };

    let imputed = parsed.iter().filter(|l| l.is_none()).count();
    if imputed > 0 {
        tracing::warn!(imputed, mode, "invalid labels imputed with dataset mode");
    }

    Ok(parsed.into_iter().map(|l| l.unwrap_or(mode)).collect())
}

fn parse_label(cell: &str) -> Option<u8> {
    let value = cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    match value.round() {
        v if v == 0.0 => Some(0),
        v if v == 1.0 => Some(1),
        _ => None,
    }
}
