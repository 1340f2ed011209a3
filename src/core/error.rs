//! Error types for the Iris SVM pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrisError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Unknown class label: {0}")]
    UnknownLabel(String),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Insufficient samples: {0}")]
    InsufficientSamples(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IrisError>;
