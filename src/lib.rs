//! RBF-kernel support vector classification of the Iris dataset
//!
//! Loads the UCI Iris table, makes a stratified train/test split, grid-searches
//! C and gamma of a standardized RBF C-SVC with stratified k-fold
//! cross-validation, evaluates the refitted winner on the held-out rows and
//! renders a decision surface and a confusion-matrix heatmap.
//!
//! The binary SVMs are trained with SMO using second-order working set
//! selection (Fan, Chen and Lin, 2005); multi-class prediction is one-vs-one.

pub mod api;
pub mod cache;
pub mod config;
pub mod core;
pub mod data;
pub mod experiment;
pub mod kernel;
pub mod metrics;
pub mod model_selection;
pub mod optimizer;
pub mod pipeline;
pub mod report;
pub mod solver;
pub mod utils;
pub mod viz;

// Re-export main types for convenience
pub use crate::api::{ModelInfo, TrainedSVC, SVC};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::config::ExperimentConfig;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{IrisError, Result};
pub use crate::data::{train_test_split, IrisDataset, LabelEncoder, StratifiedKFold};
pub use crate::kernel::{Kernel, RBFKernel};
pub use crate::metrics::{accuracy_score, confusion_matrix, f1_score_macro, ConfusionMatrix};
pub use crate::model_selection::{GridSearchCV, ParamGrid};
pub use crate::optimizer::{BinaryModel, SVMOptimizer};
pub use crate::pipeline::{FittedPipeline, Pipeline};
pub use crate::report::ExperimentReport;
pub use crate::utils::scaling::StandardScaler;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
