//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the C-SVC dual problem
//!
//! ```text
//! min  ½ αᵀQα - eᵀα
//! s.t. yᵀα = 0,  0 ≤ αᵢ ≤ C,  Qᵢⱼ = yᵢyⱼK(xᵢ, xⱼ)
//! ```
//!
//! by repeatedly optimizing a pair of multipliers. The pair is chosen with the
//! second-order working set selection of Fan, Chen and Lin (2005): `i` is the
//! maximal violator in I_up, `j` the index in I_low giving the largest
//! decrease of the objective.

use crate::cache::KernelCache;
use crate::core::{IrisError, OptimizationResult, Result, SolverConfig};
use crate::kernel::Kernel;
use log::{debug, warn};
use std::sync::Arc;

/// Replacement for a non-positive curvature along the working pair
const TAU: f64 = 1e-12;

/// SMO solver for binary SVM optimization
pub struct SMOSolver<K: Kernel> {
    kernel: Arc<K>,
    config: SolverConfig,
}

impl<K: Kernel> SMOSolver<K> {
    /// Create a new SMO solver with the given kernel and configuration
    pub fn new(kernel: Arc<K>, config: SolverConfig) -> Self {
        Self { kernel, config }
    }

    /// Get the solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the dual problem for feature rows `x` with labels `y` in {-1, +1}
    pub fn solve(&self, x: &[&[f64]], y: &[f64]) -> Result<OptimizationResult> {
        self.validate(x, y)?;

        let n = x.len();
        let c = self.config.c;
        let mut cache = KernelCache::new(self.config.cache_rows.max(2));
        let diagonal: Vec<f64> = x.iter().map(|xi| self.kernel.compute(xi, xi)).collect();

        let mut alpha = vec![0.0; n];
        // Gradient of the dual objective: G = Qα - e
        let mut gradient = vec![-1.0; n];
        let mut iterations = 0;

        loop {
            let Some((i, j)) =
                self.select_working_set(x, y, &alpha, &gradient, &diagonal, &mut cache)
            else {
                break;
            };

            if iterations >= self.config.max_iterations {
                warn!(
                    "SMO reached the maximum number of iterations ({}) before converging",
                    self.config.max_iterations
                );
                break;
            }
            iterations += 1;

            let k_i = self.kernel_row(&mut cache, x, i);
            let k_j = self.kernel_row(&mut cache, x, j);

            let (old_alpha_i, old_alpha_j) = (alpha[i], alpha[j]);
            let q_ij = y[i] * y[j] * k_i[j];

            if y[i] != y[j] {
                let mut quad_coef = diagonal[i] + diagonal[j] + 2.0 * q_ij;
                if quad_coef <= 0.0 {
                    quad_coef = TAU;
                }
                let delta = (-gradient[i] - gradient[j]) / quad_coef;
                let diff = alpha[i] - alpha[j];
                alpha[i] += delta;
                alpha[j] += delta;

                if diff > 0.0 {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = diff;
                    }
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = c - diff;
                    }
                } else {
                    if alpha[i] < 0.0 {
                        alpha[i] = 0.0;
                        alpha[j] = -diff;
                    }
                    if alpha[j] > c {
                        alpha[j] = c;
                        alpha[i] = c + diff;
                    }
                }
            } else {
                let mut quad_coef = diagonal[i] + diagonal[j] - 2.0 * q_ij;
                if quad_coef <= 0.0 {
                    quad_coef = TAU;
                }
                let delta = (gradient[i] - gradient[j]) / quad_coef;
                let sum = alpha[i] + alpha[j];
                alpha[i] -= delta;
                alpha[j] += delta;

                if sum > c {
                    if alpha[i] > c {
                        alpha[i] = c;
                        alpha[j] = sum - c;
                    }
                    if alpha[j] > c {
                        alpha[j] = c;
                        alpha[i] = sum - c;
                    }
                } else {
                    if alpha[j] < 0.0 {
                        alpha[j] = 0.0;
                        alpha[i] = sum;
                    }
                    if alpha[i] < 0.0 {
                        alpha[i] = 0.0;
                        alpha[j] = sum;
                    }
                }
            }

            let delta_alpha_i = alpha[i] - old_alpha_i;
            let delta_alpha_j = alpha[j] - old_alpha_j;
            for k in 0..n {
                gradient[k] += y[k] * (y[i] * k_i[k] * delta_alpha_i + y[j] * k_j[k] * delta_alpha_j);
            }
        }

        let rho = self.calculate_rho(y, &alpha, &gradient);
        let support_vectors: Vec<usize> = (0..n).filter(|&i| alpha[i] > 0.0).collect();
        let objective_value = alpha
            .iter()
            .zip(&gradient)
            .map(|(a, g)| a * (g - 1.0))
            .sum::<f64>()
            / 2.0;

        debug!(
            "SMO finished: n={}, iterations={}, nSV={}, obj={:.6}, rho={:.6}, cache: {}",
            n,
            iterations,
            support_vectors.len(),
            objective_value,
            rho,
            cache.stats()
        );

        Ok(OptimizationResult {
            alpha,
            rho,
            support_vectors,
            iterations,
            objective_value,
        })
    }

    fn validate(&self, x: &[&[f64]], y: &[f64]) -> Result<()> {
        if x.is_empty() {
            return Err(IrisError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(IrisError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if !(self.config.c > 0.0) {
            return Err(IrisError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.config.c
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label != 1.0 && label != -1.0) {
            return Err(IrisError::InvalidParameter(format!(
                "Binary labels must be -1 or +1, got: {bad}"
            )));
        }
        if !y.contains(&1.0) || !y.contains(&-1.0) {
            return Err(IrisError::InsufficientSamples(
                "both binary classes must be present".to_string(),
            ));
        }
        Ok(())
    }

    fn kernel_row(&self, cache: &mut KernelCache, x: &[&[f64]], i: usize) -> Arc<[f64]> {
        cache.get_or_compute(i, || self.kernel.compute_row(x[i], x))
    }

    /// Select the working pair, or `None` once the KKT conditions hold within epsilon
    fn select_working_set(
        &self,
        x: &[&[f64]],
        y: &[f64],
        alpha: &[f64],
        gradient: &[f64],
        diagonal: &[f64],
        cache: &mut KernelCache,
    ) -> Option<(usize, usize)> {
        let c = self.config.c;

        // i = argmax { -yₜGₜ | t ∈ I_up }
        let mut g_max = f64::NEG_INFINITY;
        let mut selected_i = None;
        for t in 0..alpha.len() {
            if in_upper_set(y[t], alpha[t], c) && -y[t] * gradient[t] >= g_max {
                g_max = -y[t] * gradient[t];
                selected_i = Some(t);
            }
        }
        let i = selected_i?;
        let k_i = self.kernel_row(cache, x, i);

        // j = argmin { -b²/a | t ∈ I_low, b = g_max + yₜGₜ > 0 }
        let mut g_max2 = f64::NEG_INFINITY;
        let mut selected_j = None;
        let mut obj_diff_min = f64::INFINITY;
        for t in 0..alpha.len() {
            if !in_lower_set(y[t], alpha[t], c) {
                continue;
            }
            let y_grad = y[t] * gradient[t];
            if y_grad >= g_max2 {
                g_max2 = y_grad;
            }
            let grad_diff = g_max + y_grad;
            if grad_diff > 0.0 {
                let mut quad_coef = diagonal[i] + diagonal[t] - 2.0 * k_i[t];
                if quad_coef <= 0.0 {
                    quad_coef = TAU;
                }
                let obj_diff = -(grad_diff * grad_diff) / quad_coef;
                if obj_diff <= obj_diff_min {
                    obj_diff_min = obj_diff;
                    selected_j = Some(t);
                }
            }
        }

        if g_max + g_max2 < self.config.epsilon {
            return None;
        }
        selected_j.map(|j| (i, j))
    }

    /// Decision threshold: mean of yᵢGᵢ over free multipliers, or the midpoint
    /// of the feasible interval when every multiplier sits at a bound
    fn calculate_rho(&self, y: &[f64], alpha: &[f64], gradient: &[f64]) -> f64 {
        let c = self.config.c;
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_count = 0;
        let mut free_sum = 0.0;

        for t in 0..alpha.len() {
            let y_grad = y[t] * gradient[t];
            if alpha[t] >= c {
                if y[t] < 0.0 {
                    upper = upper.min(y_grad);
                } else {
                    lower = lower.max(y_grad);
                }
            } else if alpha[t] <= 0.0 {
                if y[t] > 0.0 {
                    upper = upper.min(y_grad);
                } else {
                    lower = lower.max(y_grad);
                }
            } else {
                free_count += 1;
                free_sum += y_grad;
            }
        }

        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

/// t ∈ I_up: αₜ can move so that yₜαₜ increases
fn in_upper_set(y: f64, alpha: f64, c: f64) -> bool {
    (y > 0.0 && alpha < c) || (y < 0.0 && alpha > 0.0)
}

/// t ∈ I_low: αₜ can move so that yₜαₜ decreases
fn in_lower_set(y: f64, alpha: f64, c: f64) -> bool {
    (y > 0.0 && alpha > 0.0) || (y < 0.0 && alpha < c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::RBFKernel;
    use approx::assert_relative_eq;

    fn solver(gamma: f64, c: f64) -> SMOSolver<RBFKernel> {
        let config = SolverConfig {
            c,
            ..SolverConfig::default()
        };
        SMOSolver::new(Arc::new(RBFKernel::new(gamma)), config)
    }

    fn rows(points: &[Vec<f64>]) -> Vec<&[f64]> {
        points.iter().map(|p| p.as_slice()).collect()
    }

    fn decision(
        kernel: &RBFKernel,
        x: &[&[f64]],
        y: &[f64],
        result: &OptimizationResult,
        point: &[f64],
    ) -> f64 {
        result
            .support_vectors
            .iter()
            .map(|&i| result.alpha[i] * y[i] * kernel.compute(x[i], point))
            .sum::<f64>()
            - result.rho
    }

    #[test]
    fn test_smo_solver_empty_dataset() {
        let result = solver(1.0, 1.0).solve(&[], &[]);
        assert!(matches!(result, Err(IrisError::EmptyDataset)));
    }

    #[test]
    fn test_smo_solver_invalid_labels() {
        let points = vec![vec![1.0], vec![2.0]];
        let result = solver(1.0, 1.0).solve(&rows(&points), &[1.0, 0.5]);
        assert!(matches!(result, Err(IrisError::InvalidParameter(_))));
    }

    #[test]
    fn test_smo_solver_single_class() {
        let points = vec![vec![1.0], vec![2.0]];
        let result = solver(1.0, 1.0).solve(&rows(&points), &[1.0, 1.0]);
        assert!(matches!(result, Err(IrisError::InsufficientSamples(_))));
    }

    #[test]
    fn test_smo_solver_non_positive_c() {
        let points = vec![vec![1.0], vec![-1.0]];
        let result = solver(1.0, 0.0).solve(&rows(&points), &[1.0, -1.0]);
        assert!(matches!(result, Err(IrisError::InvalidParameter(_))));
    }

    #[test]
    fn test_smo_solver_length_mismatch() {
        let points = vec![vec![1.0], vec![-1.0]];
        let result = solver(1.0, 1.0).solve(&rows(&points), &[1.0]);
        assert!(matches!(
            result,
            Err(IrisError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_smo_solver_symmetric_pair_closed_form() {
        // Two mirrored points: the optimum is α₁ = α₂ = 1 / (1 - K₁₂), rho = 0
        let points = vec![vec![1.0], vec![-1.0]];
        let y = [1.0, -1.0];
        let result = solver(0.5, 10.0).solve(&rows(&points), &y).unwrap();

        let k12 = (-2.0_f64).exp();
        let expected = 1.0 / (1.0 - k12);
        assert_relative_eq!(result.alpha[0], expected, epsilon = 1e-9);
        assert_relative_eq!(result.alpha[1], expected, epsilon = 1e-9);
        assert_relative_eq!(result.rho, 0.0, epsilon = 1e-9);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.support_vectors, vec![0, 1]);
    }

    #[test]
    fn test_smo_solver_box_and_equality_constraints() {
        let points = vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![0.9, 1.1],
            vec![1.0, 0.8],
            vec![0.5, 0.4],
            vec![0.45, 0.6],
        ];
        let y = [1.0, 1.0, -1.0, -1.0, 1.0, -1.0];
        let c = 2.0;
        let result = solver(2.0, c).solve(&rows(&points), &y).unwrap();

        for &a in &result.alpha {
            assert!((0.0..=c).contains(&a), "alpha {a} outside [0, C]");
        }
        let balance: f64 = result.alpha.iter().zip(&y).map(|(a, yi)| a * yi).sum();
        assert_relative_eq!(balance, 0.0, epsilon = 1e-9);
        assert!(result.objective_value < 0.0);
    }

    #[test]
    fn test_smo_solver_xor_with_rbf() {
        let points = vec![
            vec![1.0, 1.0],
            vec![-1.0, -1.0],
            vec![1.0, -1.0],
            vec![-1.0, 1.0],
        ];
        let y = [1.0, 1.0, -1.0, -1.0];
        let kernel = RBFKernel::new(1.0);
        let x = rows(&points);
        let result = solver(1.0, 10.0).solve(&x, &y).unwrap();

        for (point, &label) in points.iter().zip(&y) {
            let value = decision(&kernel, &x, &y, &result, point);
            assert_eq!(value.signum(), label, "misclassified {point:?}");
        }
        assert_eq!(result.support_vectors.len(), 4);
    }

    #[test]
    fn test_smo_solver_max_iterations() {
        let points = vec![
            vec![1.0, 1.0],
            vec![-1.0, -1.0],
            vec![1.0, -1.0],
            vec![-1.0, 1.0],
        ];
        let config = SolverConfig {
            c: 10.0,
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let solver = SMOSolver::new(Arc::new(RBFKernel::new(1.0)), config);
        let result = solver
            .solve(&rows(&points), &[1.0, 1.0, -1.0, -1.0])
            .unwrap();

        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_working_set_membership() {
        assert!(in_upper_set(1.0, 0.0, 1.0));
        assert!(!in_upper_set(1.0, 1.0, 1.0));
        assert!(in_upper_set(-1.0, 0.5, 1.0));
        assert!(!in_upper_set(-1.0, 0.0, 1.0));

        assert!(in_lower_set(1.0, 0.5, 1.0));
        assert!(!in_lower_set(1.0, 0.0, 1.0));
        assert!(in_lower_set(-1.0, 0.0, 1.0));
        assert!(!in_lower_set(-1.0, 1.0, 1.0));
    }
}
