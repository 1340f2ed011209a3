//! Run report: console summary and JSON persistence

use crate::core::{Result, SvcParams};
use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::model_selection::CvResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Provenance of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Library version that produced the report
    pub library_version: String,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    pub data_path: PathBuf,
}

impl RunMetadata {
    pub fn new(seed: u64, data_path: &Path) -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            seed,
            data_path: data_path.to_path_buf(),
        }
    }
}

/// Everything one experiment produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub metadata: RunMetadata,
    pub class_names: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub best_params: SvcParams,
    /// Mean cross-validation accuracy of `best_params`
    pub best_cv_score: f64,
    pub test_accuracy: f64,
    pub macro_f1: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub support_vectors_per_class: Vec<usize>,
    pub classification_report: ClassificationReport,
    pub cv_results: CvResults,
    /// Plot files written during the run
    pub plots: Vec<PathBuf>,
}

impl ExperimentReport {
    /// Save report to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load report from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(BufReader::new(file))?;
        Ok(report)
    }

    /// Console summary: parameters, scores, confusion matrix, support counts
    pub fn summary(&self) -> String {
        format!(
            "Best parameters :  {}\n\
             Test accuracy   :  {:.3}\n\
             Macro-F1 score  :  {:.3}\n\
             \n\
             Confusion matrix:\n \
             {}\n\
             Support vectors per class: {}",
            self.best_params,
            self.test_accuracy,
            self.macro_f1,
            self.confusion_matrix,
            format_counts(&self.support_vectors_per_class)
        )
    }

    pub fn print_summary(&self) {
        println!("{}", self.summary());
    }
}

/// `[ 7 20 17]`: right-aligned to the widest entry
fn format_counts(counts: &[usize]) -> String {
    let width = counts
        .iter()
        .map(|c| c.to_string().len())
        .max()
        .unwrap_or(0);
    let cells: Vec<String> = counts.iter().map(|c| format!("{:>width$}", c)).collect();
    format!("[{}]", cells.join(" "))
}
