//! Core type definitions shared by the pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// A labelled observation with dense features
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Feature values in column order
    pub features: Vec<f64>,
    /// Integer class code
    pub label: usize,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: usize) -> Self {
        Self { features, label }
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.features.len()
    }

    /// Project the sample onto a subset of its columns
    ///
    /// # Panics
    /// Panics if a column index is out of range
    pub fn select(&self, columns: &[usize]) -> Sample {
        let features = columns.iter().map(|&c| self.features[c]).collect();
        Sample::new(features, self.label)
    }
}

/// Count samples per class code. The result has `max_label + 1` entries.
pub fn class_counts(samples: &[Sample]) -> Vec<usize> {
    let n_classes = samples.iter().map(|s| s.label + 1).max().unwrap_or(0);
    let mut counts = vec![0; n_classes];
    for sample in samples {
        counts[sample.label] += 1;
    }
    counts
}

/// Hyperparameters of an RBF C-SVC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvcParams {
    /// Regularization strength (upper bound for alpha)
    #[serde(rename = "C")]
    pub c: f64,
    /// RBF kernel width
    pub gamma: f64,
}

impl SvcParams {
    pub fn new(c: f64, gamma: f64) -> Self {
        Self { c, gamma }
    }
}

impl fmt::Display for SvcParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{C: {}, gamma: {}}}", self.c, self.gamma)
    }
}

/// Result of one binary dual optimization
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Decision threshold; f(x) = Σ αᵢyᵢK(xᵢ, x) - rho
    pub rho: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
}

/// Configuration for the SMO solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Stopping tolerance on the maximal KKT violation
    pub epsilon: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Number of kernel rows kept in the LRU cache
    pub cache_rows: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 10_000_000,
            cache_rows: 1024,
        }
    }
}
