//! Kernel trait definition

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
/// Inputs are dense feature vectors of equal length.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;

    /// Compute K(x, xᵢ) for every row of `rows`
    fn compute_row(&self, x: &[f64], rows: &[&[f64]]) -> Vec<f64> {
        rows.iter().map(|row| self.compute(x, row)).collect()
    }
}
