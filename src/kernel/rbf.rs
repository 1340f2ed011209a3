//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::kernel::Kernel;

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each training example:
/// - High gamma: close points have high influence (potential overfitting)
/// - Low gamma: distant points have influence (potential underfitting)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RBFKernel {
    /// Default RBF kernel with gamma = 1.0
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (-self.gamma * squared_euclidean_distance(x, y)).exp()
    }
}

/// Squared Euclidean distance ||x - y||² between two dense vectors
pub fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "Vectors must have same length");
    x.iter()
        .zip(y)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rbf_kernel_creation() {
        assert_eq!(RBFKernel::new(0.5).gamma(), 0.5);
        assert_eq!(RBFKernel::default().gamma(), 1.0);
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_kernel_invalid_gamma() {
        RBFKernel::new(-0.5);
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_kernel_zero_gamma() {
        RBFKernel::new(0.0);
    }

    #[test]
    fn test_rbf_kernel_identical_vectors() {
        let kernel = RBFKernel::new(1.0);
        let x = [1.0, 2.0, 3.0];

        // K(x, x) is always 1 for RBF
        assert_relative_eq!(kernel.compute(&x, &x), 1.0);
    }

    #[test]
    fn test_rbf_kernel_known_value() {
        let kernel = RBFKernel::new(0.1);
        let x = [1.0, 0.0];
        let y = [3.0, 0.0];

        // ||x - y||² = 4
        assert_relative_eq!(kernel.compute(&x, &y), (-0.4_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_kernel_different_gammas() {
        let x = [1.0];
        let y = [3.0];

        let low = RBFKernel::new(0.1).compute(&x, &y);
        let high = RBFKernel::new(10.0).compute(&x, &y);

        // Low gamma should give higher similarity at the same distance
        assert!(low > high);
    }

    #[test]
    fn test_rbf_kernel_symmetry() {
        let kernel = RBFKernel::new(0.5);
        let x = [1.0, 0.0, 2.0];
        let y = [0.0, 1.0, 3.0];
        assert_eq!(kernel.compute(&x, &y), kernel.compute(&y, &x));
    }

    #[test]
    fn test_rbf_kernel_decreases_with_distance() {
        let kernel = RBFKernel::new(1.0);
        let origin = [0.0];

        let k1 = kernel.compute(&origin, &[1.0]);
        let k2 = kernel.compute(&origin, &[2.0]);
        let k3 = kernel.compute(&origin, &[3.0]);

        assert!(k1 > k2 && k2 > k3);
        assert!((0.0..=1.0).contains(&k3));
    }

    #[test]
    fn test_compute_row() {
        let kernel = RBFKernel::new(1.0);
        let a = [0.0, 0.0];
        let b = [1.0, 0.0];
        let rows: [&[f64]; 2] = [&a, &b];
        let row = kernel.compute_row(&a, &rows);
        assert_eq!(row.len(), 2);
        assert_relative_eq!(row[0], 1.0);
        assert_relative_eq!(row[1], (-1.0_f64).exp());
    }

    #[test]
    fn test_squared_euclidean_distance() {
        assert_eq!(squared_euclidean_distance(&[1.0, 3.0], &[2.0, 1.0]), 5.0);
        assert_eq!(squared_euclidean_distance(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert_eq!(squared_euclidean_distance(&[], &[]), 0.0);
    }

    #[test]
    fn test_rbf_kernel_numerical_stability() {
        let kernel = RBFKernel::new(1e-6);
        let result = kernel.compute(&[1e6], &[-1e6]);
        assert!(result.is_finite());
        assert!((0.0..=1.0).contains(&result));
    }
}
