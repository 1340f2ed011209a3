//! Binary SVM training
//!
//! Couples a kernel with the SMO solver and turns the raw dual solution into a
//! compact binary model holding only the support vectors' coefficients.

use crate::core::{OptimizationResult, Result, SolverConfig};
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use std::sync::Arc;

/// Trains binary (±1) SVMs with a fixed kernel and solver configuration
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: SolverConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    /// Create a new SVM optimizer with the given kernel and configuration
    pub fn new(kernel: Arc<K>, config: SolverConfig) -> Self {
        Self { kernel, config }
    }

    /// Train on feature rows `x` with labels `y` in {-1, +1}
    pub fn train(&self, x: &[&[f64]], y: &[f64]) -> Result<BinaryModel> {
        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(x, y)?;
        Ok(BinaryModel::from_solution(y, result))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// Support vectors of one binary problem and their coefficients αᵢyᵢ
#[derive(Debug, Clone)]
pub struct BinaryModel {
    support_indices: Vec<usize>,
    dual_coef: Vec<f64>,
    rho: f64,
    iterations: usize,
}

impl BinaryModel {
    fn from_solution(y: &[f64], result: OptimizationResult) -> Self {
        let dual_coef = result
            .support_vectors
            .iter()
            .map(|&i| result.alpha[i] * y[i])
            .collect();

        Self {
            support_indices: result.support_vectors,
            dual_coef,
            rho: result.rho,
            iterations: result.iterations,
        }
    }

    /// Indices of the support vectors in the training rows
    pub fn support_indices(&self) -> &[usize] {
        &self.support_indices
    }

    /// αᵢyᵢ for each support vector
    pub fn dual_coef(&self) -> &[f64] {
        &self.dual_coef
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// SMO iterations spent training
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
