//! High-level multi-class support vector classifier
//!
//! `SVC` trains one binary machine per pair of classes (one-vs-one) and
//! predicts by majority vote, the scheme used by libsvm.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use iris_svm::api::SVC;
//! use iris_svm::{Predictor, Sample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples = vec![
//!     Sample::new(vec![0.0, 0.0], 0),
//!     Sample::new(vec![5.0, 5.0], 1),
//!     Sample::new(vec![0.0, 5.0], 2),
//! ];
//! let model = SVC::with_rbf(0.5).with_c(10.0).fit(&samples)?;
//! println!("class = {}", model.predict(&[0.2, 4.7]));
//! println!("support vectors per class = {:?}", model.n_support());
//! # Ok(())
//! # }
//! ```

use crate::core::{
    class_counts, Estimator, IrisError, Predictor, Result, Sample, SolverConfig, SvcParams,
};
use crate::kernel::{Kernel, RBFKernel};
use crate::optimizer::SVMOptimizer;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// C-SVC with builder-style configuration
pub struct SVC<K: Kernel = RBFKernel> {
    kernel: Arc<K>,
    config: SolverConfig,
}

impl SVC<RBFKernel> {
    /// Create a new SVC with an RBF kernel (gamma = 1.0) and default parameters
    pub fn new() -> Self {
        Self::with_kernel(RBFKernel::default())
    }

    /// Create an SVC with an RBF kernel of the given width
    pub fn with_rbf(gamma: f64) -> Self {
        Self::with_kernel(RBFKernel::new(gamma))
    }

    /// Create an SVC from a grid point
    pub fn from_params(params: &SvcParams) -> Self {
        Self::with_rbf(params.gamma).with_c(params.c)
    }
}

impl Default for SVC<RBFKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> Clone for SVC<K> {
    fn clone(&self) -> Self {
        Self {
            kernel: Arc::clone(&self.kernel),
            config: self.config.clone(),
        }
    }
}

impl<K: Kernel> SVC<K> {
    /// Create SVC with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config: SolverConfig::default(),
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set maximum number of SMO iterations per binary problem
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the number of cached kernel rows
    pub fn with_cache_rows(mut self, cache_rows: usize) -> Self {
        self.config.cache_rows = cache_rows;
        self
    }

    /// Replace the solver settings, keeping the current C
    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        let c = self.config.c;
        self.config = SolverConfig { c, ..config };
        self
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Train one binary machine per class pair
    pub fn fit(&self, samples: &[Sample]) -> Result<TrainedSVC<K>> {
        let n_features = validate_samples(samples)?;
        let counts = class_counts(samples);
        let present: Vec<usize> = (0..counts.len()).filter(|&k| counts[k] > 0).collect();
        if present.len() < 2 {
            return Err(IrisError::InsufficientSamples(format!(
                "at least two classes are required, found {}",
                present.len()
            )));
        }

        let optimizer = SVMOptimizer::new(Arc::clone(&self.kernel), self.config.clone());
        let mut is_support = vec![false; samples.len()];
        let mut raw_pairs = Vec::new();

        for (a, &positive) in present.iter().enumerate() {
            for &negative in &present[a + 1..] {
                let indices: Vec<usize> = (0..samples.len())
                    .filter(|&k| samples[k].label == positive || samples[k].label == negative)
                    .collect();
                let x: Vec<&[f64]> = indices
                    .iter()
                    .map(|&k| samples[k].features.as_slice())
                    .collect();
                let y: Vec<f64> = indices
                    .iter()
                    .map(|&k| if samples[k].label == positive { 1.0 } else { -1.0 })
                    .collect();

                let model = optimizer.train(&x, &y)?;
                debug!(
                    "pair ({positive}, {negative}): {} samples, {} support vectors, {} iterations",
                    indices.len(),
                    model.support_indices().len(),
                    model.iterations()
                );

                let support: Vec<usize> = model
                    .support_indices()
                    .iter()
                    .map(|&local| indices[local])
                    .collect();
                for &k in &support {
                    is_support[k] = true;
                }
                raw_pairs.push((positive, negative, support, model.dual_coef().to_vec(), model.rho()));
            }
        }

        // Support vectors are stored grouped by class, in training order within a class
        let mut order: Vec<usize> = (0..samples.len()).filter(|&k| is_support[k]).collect();
        order.sort_by_key(|&k| samples[k].label);
        let position: HashMap<usize, usize> =
            order.iter().enumerate().map(|(pos, &k)| (k, pos)).collect();

        let mut n_support = vec![0; counts.len()];
        for &k in &order {
            n_support[samples[k].label] += 1;
        }

        let pairs = raw_pairs
            .into_iter()
            .map(|(positive, negative, support, dual_coef, rho)| PairwiseModel {
                positive,
                negative,
                support: support.iter().map(|k| position[k]).collect(),
                dual_coef,
                rho,
            })
            .collect();

        Ok(TrainedSVC {
            kernel: Arc::clone(&self.kernel),
            n_features,
            n_support,
            support_vectors: order.iter().map(|&k| samples[k].clone()).collect(),
            pairs,
        })
    }
}

impl<K: Kernel> Estimator for SVC<K> {
    type Fitted = TrainedSVC<K>;

    fn fit(&self, samples: &[Sample]) -> Result<TrainedSVC<K>> {
        SVC::<K>::fit(self, samples)
    }
}

/// Check the samples are non-empty and share one dimensionality
fn validate_samples(samples: &[Sample]) -> Result<usize> {
    let first = samples.first().ok_or(IrisError::EmptyDataset)?;
    let n_features = first.dim();
    if let Some(bad) = samples.iter().find(|s| s.dim() != n_features) {
        return Err(IrisError::DimensionMismatch {
            expected: n_features,
            actual: bad.dim(),
        });
    }
    Ok(n_features)
}

/// One binary machine; `support` indexes the shared support-vector table
#[derive(Debug, Clone)]
struct PairwiseModel {
    positive: usize,
    negative: usize,
    support: Vec<usize>,
    dual_coef: Vec<f64>,
    rho: f64,
}

/// Trained one-vs-one classifier
pub struct TrainedSVC<K: Kernel> {
    kernel: Arc<K>,
    n_features: usize,
    n_support: Vec<usize>,
    support_vectors: Vec<Sample>,
    pairs: Vec<PairwiseModel>,
}

impl<K: Kernel> TrainedSVC<K> {
    /// Decision value of every pairwise machine, in `class_pairs()` order.
    /// Positive values favour the first class of the pair.
    pub fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        let kernel_values: Vec<f64> = self
            .support_vectors
            .iter()
            .map(|sv| self.kernel.compute(&sv.features, features))
            .collect();

        self.pairs
            .iter()
            .map(|pair| {
                pair.support
                    .iter()
                    .zip(&pair.dual_coef)
                    .map(|(&s, coef)| coef * kernel_values[s])
                    .sum::<f64>()
                    - pair.rho
            })
            .collect()
    }

    /// Class pairs `(positive, negative)` in training order
    pub fn class_pairs(&self) -> Vec<(usize, usize)> {
        self.pairs.iter().map(|p| (p.positive, p.negative)).collect()
    }

    /// Support vectors per class, indexed by class code
    pub fn n_support(&self) -> &[usize] {
        &self.n_support
    }

    /// Support vectors grouped by class
    pub fn support_vectors(&self) -> &[Sample] {
        &self.support_vectors
    }

    /// Number of class codes the model knows (largest code + 1)
    pub fn n_classes(&self) -> usize {
        self.n_support.len()
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_support_vectors: self.support_vectors.len(),
            n_support: self.n_support.clone(),
            rho: self.pairs.iter().map(|p| p.rho).collect(),
        }
    }
}

impl<K: Kernel> Predictor for TrainedSVC<K> {
    fn predict(&self, features: &[f64]) -> usize {
        let values = self.decision_function(features);
        vote(self.n_classes(), &self.class_pairs(), &values)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Majority vote over pairwise decisions; ties go to the lowest class code
fn vote(n_classes: usize, pairs: &[(usize, usize)], values: &[f64]) -> usize {
    let mut votes = vec![0usize; n_classes];
    for (&(positive, negative), &value) in pairs.iter().zip(values) {
        if value > 0.0 {
            votes[positive] += 1;
        } else {
            votes[negative] += 1;
        }
    }

    let mut winner = 0;
    for class in 1..n_classes {
        if votes[class] > votes[winner] {
            winner = class;
        }
    }
    winner
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_support_vectors: usize,
    pub n_support: Vec<usize>,
    pub rho: Vec<f64>,
}
