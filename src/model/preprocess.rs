//! Column-wise preprocessing: numeric standardization + categorical one-hot.
//!
//! Statistics and vocabularies are learned once at fit time and frozen;
//! inference only reads them. Unknown categories at inference encode as the
//! all-zero indicator instead of failing, matching the "reduced information,
//! not an error" contract.

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::schema::{CATEGORICAL_COUNT, CATEGORICAL_FEATURES, NUMERIC_COUNT};

use super::record::VehicleRecord;

/// Zero-variance columns pass through unscaled
const MIN_STD: f64 = 1e-12;

// ============================================================================
// STANDARD SCALER
// ============================================================================

/// Per-column mean/std learned from the fit-time distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(records: &[VehicleRecord]) -> Self {
        let n = records.len() as f64;
        let mut means = vec![0.0; NUMERIC_COUNT];
        let mut stds = vec![1.0; NUMERIC_COUNT];

        for record in records {
            for (slot, value) in record.numeric_values().into_iter().enumerate() {
                means[slot] += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        for (slot, std) in stds.iter_mut().enumerate() {
            let variance = records
                .iter()
                .map(|r| (r.numeric_values()[slot] - means[slot]).powi(2))
                .sum::<f64>()
                / n;
            let sigma = variance.sqrt();
            *std = if sigma > MIN_STD { sigma } else { 1.0 };
        }

        Self { means, stds }
    }

    pub fn transform(&self, values: &[f64; NUMERIC_COUNT]) -> [f64; NUMERIC_COUNT] {
        let mut scaled = [0.0; NUMERIC_COUNT];
        for (slot, value) in values.iter().enumerate() {
            scaled[slot] = (value - self.means[slot]) / self.stds[slot];
        }
        scaled
    }
}

// ============================================================================
// ONE-HOT ENCODER
// ============================================================================

/// Per-column category vocabulary learned at fit time, sorted so the
/// encoded layout is deterministic across fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabularies: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn fit(records: &[VehicleRecord]) -> Self {
        let mut sets: Vec<BTreeSet<String>> = vec![BTreeSet::new(); CATEGORICAL_COUNT];
        for record in records {
            for (slot, value) in record.categorical_values().into_iter().enumerate() {
                let value = value.trim();
                if !value.is_empty() {
                    sets[slot].insert(value.to_string());
                }
            }
        }
        Self {
            vocabularies: sets.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }

    /// Total width of the one-hot block
    pub fn width(&self) -> usize {
        self.vocabularies.iter().map(Vec::len).sum()
    }

    /// Append indicators for `values` onto `out`. Values never seen at fit
    /// time contribute an all-zero group.
    pub fn encode_into(&self, values: &[&str; CATEGORICAL_COUNT], out: &mut Vec<f64>) {
        for (slot, value) in values.iter().enumerate() {
            let vocabulary = &self.vocabularies[slot];
            let hit = vocabulary.iter().position(|v| v == value.trim());
            for i in 0..vocabulary.len() {
                out.push(if hit == Some(i) { 1.0 } else { 0.0 });
            }
        }
    }

    /// Allowed values per categorical feature, in (feature, vocabulary) pairs
    pub fn vocabularies(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        CATEGORICAL_FEATURES
            .iter()
            .zip(&self.vocabularies)
            .map(|(&name, vocab)| (name, vocab.as_slice()))
    }
}

// ============================================================================
// COMBINED PREPROCESSOR
// ============================================================================

/// Composed transform: scaled numeric block followed by one-hot block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl Preprocessor {
    pub fn fit(records: &[VehicleRecord]) -> Self {
        Self {
            scaler: StandardScaler::fit(records),
            encoder: OneHotEncoder::fit(records),
        }
    }

    /// Width of the transformed feature vector. Fixed once fit.
    pub fn output_width(&self) -> usize {
        NUMERIC_COUNT + self.encoder.width()
    }

    /// Transform one record into a dense feature vector.
    pub fn transform(&self, record: &VehicleRecord) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.output_width());
        out.extend(self.scaler.transform(&record.numeric_values()));
        self.encoder.encode_into(&record.categorical_values(), &mut out);
        out
    }

    /// Transform the full training set into a design matrix.
    pub fn transform_matrix(&self, records: &[VehicleRecord]) -> Array2<f64> {
        let width = self.output_width();
        let mut matrix = Array2::zeros((records.len(), width));
        for (i, record) in records.iter().enumerate() {
            for (j, value) in self.transform(record).into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }
}
