//! Single CART-style decision tree for binary classification.
//!
//! Grown by recursive binary splitting on Gini impurity. Each split
//! considers a random subset of candidate features, which is what gives a
//! forest of these trees its diversity. Leaves store class counts; a tree
//! votes for the majority class at the reached leaf.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for one tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Candidate features considered at each split
    pub features_per_split: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        counts: [usize; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Grow a tree over the rows named by `indices` (bootstrap sample).
    pub fn fit(
        matrix: &ArrayView2<'_, f64>,
        labels: &[u8],
        indices: &[usize],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let root = grow(matrix, labels, indices, params, rng, 0);
        Self { root }
    }

    /// Majority class at the reached leaf; ties resolve to 0.
    pub fn predict(&self, features: &[f64]) -> u8 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { counts } => {
                    return if counts[1] > counts[0] { 1 } else { 0 };
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn class_counts(labels: &[u8], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &i in indices {
        counts[labels[i] as usize] += 1;
    }
    counts
}

fn gini(counts: [usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / total;
    let p1 = counts[1] as f64 / total;
    1.0 - p0 * p0 - p1 * p1
}

fn grow(
    matrix: &ArrayView2<'_, f64>,
    labels: &[u8],
    indices: &[usize],
    params: TreeParams,
    rng: &mut StdRng,
    depth: usize,
) -> Node {
    let counts = class_counts(labels, indices);

    let pure = counts[0] == 0 || counts[1] == 0;
    if pure || depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node::Leaf { counts };
    }

    match best_split(matrix, labels, indices, params, rng) {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| matrix[[i, feature]] <= threshold);

            // A degenerate partition means the threshold separated nothing
            if left_idx.is_empty() || right_idx.is_empty() {
                return Node::Leaf { counts };
            }

            Node::Split {
                feature,
                threshold,
                left: Box::new(grow(matrix, labels, &left_idx, params, rng, depth + 1)),
                right: Box::new(grow(matrix, labels, &right_idx, params, rng, depth + 1)),
            }
        }
        None => Node::Leaf { counts },
    }
}

/// Pick `features_per_split` distinct candidate features, then find the
/// (feature, threshold) pair with the lowest weighted child impurity.
fn best_split(
    matrix: &ArrayView2<'_, f64>,
    labels: &[u8],
    indices: &[usize],
    params: TreeParams,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let width = matrix.ncols();
    let candidates = sample_features(width, params.features_per_split.min(width), rng);

    let parent_gini = gini(class_counts(labels, indices));
    let total = indices.len() as f64;

    let mut best: Option<(usize, f64)> = None;
    let mut best_impurity = parent_gini - 1e-12;

    for feature in candidates {
        let mut column: Vec<(f64, u8)> = indices
            .iter()
            .map(|&i| (matrix[[i, feature]], labels[i]))
            .collect();
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = [0usize; 2];
        let mut right = class_counts(labels, indices);

        for window in 0..column.len().saturating_sub(1) {
            let (value, label) = column[window];
            left[label as usize] += 1;
            right[label as usize] -= 1;

            let next_value = column[window + 1].0;
            if next_value <= value {
                continue; // no boundary between equal values
            }

            let n_left = (window + 1) as f64;
            let n_right = total - n_left;
            let impurity = (n_left / total) * gini(left) + (n_right / total) * gini(right);

            if impurity < best_impurity {
                best_impurity = impurity;
                best = Some((feature, value + (next_value - value) / 2.0));
            }
        }
    }

    best
}

/// Partial Fisher-Yates draw of `k` distinct feature indices.
fn sample_features(width: usize, k: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..width).collect();
    for i in 0..k {
        let j = rng.gen_range(i..width);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}
