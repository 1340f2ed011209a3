//! Cross-validation and exhaustive hyperparameter search

pub mod cv;
pub mod grid;

pub use self::cv::cross_val_score;
pub use self::grid::{CandidateResult, CvResults, GridSearchCV, GridSearchResult, ParamGrid};
