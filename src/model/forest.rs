//! Random Forest Ensemble
//!
//! Independently grown decision trees, each on a bootstrap resample of the
//! training rows with randomized per-split feature subsets. The forest
//! predicts by majority vote; the probability estimate is the fraction of
//! trees voting for each class. All randomness flows from a single seed so
//! that refitting on identical data yields an identical model.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeParams};
use super::ModelError;

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 12,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    params: ForestParams,
}

impl RandomForest {
    /// Fit the forest on a design matrix and binary labels.
    ///
    /// Each bootstrap resample has the same size as the training set, drawn
    /// with replacement. A single-class dataset still fits; every tree then
    /// degenerates to one leaf.
    pub fn fit(matrix: &Array2<f64>, labels: &[u8], params: ForestParams) -> Result<Self, ModelError> {
        let rows = matrix.nrows();
        if rows == 0 || labels.len() != rows {
            return Err(ModelError::ShapeMismatch {
                rows,
                labels: labels.len(),
            });
        }
        if params.n_trees == 0 {
            return Err(ModelError::NoTrees);
        }

        let width = matrix.ncols();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            features_per_split: (width as f64).sqrt().ceil() as usize,
        };

        let view = matrix.view();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let bootstrap: Vec<usize> = (0..rows).map(|_| rng.gen_range(0..rows)).collect();
            trees.push(DecisionTree::fit(
                &view,
                labels,
                &bootstrap,
                tree_params,
                &mut rng,
            ));
        }

        Ok(Self { trees, params })
    }

    /// Vote fractions `[p_class0, p_class1]`; always sums to 1.0.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; 2] {
        let failure_votes = self
            .trees
            .iter()
            .filter(|tree| tree.predict(features) == 1)
            .count();
        let n = self.trees.len() as f64;
        let p1 = failure_votes as f64 / n;
        [1.0 - p1, p1]
    }

    /// Majority vote; ties resolve to class 0.
    pub fn predict(&self, features: &[f64]) -> u8 {
        let proba = self.predict_proba(features);
        u8::from(proba[1] > proba[0])
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> ForestParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n_trees: usize) -> ForestParams {
        ForestParams {
            n_trees,
            max_depth: 8,
            min_samples_split: 2,
            seed: 42,
        }
    }

    /// Two informative features and one noise column.
    fn separable_data(n: usize) -> (Array2<f64>, Vec<u8>) {
        let mut rows = Vec::with_capacity(n * 3);
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let x = i as f64 / n as f64;
            let label = u8::from(x > 0.5);
            rows.extend([x, 1.0 - x, (i % 7) as f64]);
            labels.push(label);
        }
        (Array2::from_shape_vec((n, 3), rows).unwrap(), labels)
    }

    #[test]
    fn test_forest_probabilities_sum_to_one() {
        let (matrix, labels) = separable_data(60);
        let forest = RandomForest::fit(&matrix, &labels, params(25)).unwrap();

        for features in [[0.1, 0.9, 3.0], [0.9, 0.1, 3.0], [0.5, 0.5, 3.0]] {
            let proba = forest.predict_proba(&features);
            assert!(proba[0] >= 0.0 && proba[1] >= 0.0);
            assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);

            let expected = u8::from(proba[1] > proba[0]);
            assert_eq!(forest.predict(&features), expected);
        }
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (matrix, labels) = separable_data(60);
        let forest = RandomForest::fit(&matrix, &labels, params(25)).unwrap();
        assert_eq!(forest.predict(&[0.05, 0.95, 2.0]), 0);
        assert_eq!(forest.predict(&[0.95, 0.05, 2.0]), 1);
    }

    #[test]
    fn test_forest_deterministic_for_same_seed() {
        let (matrix, labels) = separable_data(60);
        let forest_a = RandomForest::fit(&matrix, &labels, params(25)).unwrap();
        let forest_b = RandomForest::fit(&matrix, &labels, params(25)).unwrap();

        for features in [[0.2, 0.8, 1.0], [0.6, 0.4, 5.0], [0.47, 0.53, 0.0]] {
            assert_eq!(
                forest_a.predict_proba(&features),
                forest_b.predict_proba(&features)
            );
        }
    }

    #[test]
    fn test_forest_single_class_still_fits() {
        let (matrix, _) = separable_data(30);
        let labels = vec![1u8; 30];
        let forest = RandomForest::fit(&matrix, &labels, params(10)).unwrap();
        assert_eq!(forest.predict_proba(&[0.5, 0.5, 1.0]), [0.0, 1.0]);
    }

    #[test]
    fn test_forest_rejects_shape_mismatch() {
        let (matrix, mut labels) = separable_data(30);
        labels.pop();
        assert!(matches!(
            RandomForest::fit(&matrix, &labels, params(5)),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }
}
