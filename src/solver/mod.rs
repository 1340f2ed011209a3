//! SVM solver implementations
//!
//! This module implements the Sequential Minimal Optimization (SMO) algorithm
//! for the binary C-SVC dual problem.

pub mod smo;

pub use self::smo::*;
