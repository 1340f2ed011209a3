//! Experiment configuration
//!
//! Defaults reproduce the reference run: `iris.data`, seed 1, an 80/20
//! split, 5 stratified folds and the 4 x 4 (C, gamma) grid.

use crate::core::{IrisError, Result, SolverConfig};
use crate::model_selection::grid::{DEFAULT_C_VALUES, DEFAULT_GAMMA_VALUES};
use crate::model_selection::ParamGrid;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Input file in UCI `iris.data` layout
    pub data_path: PathBuf,
    /// Seed for the train/test split and the fold shuffles
    pub seed: u64,
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Number of cross-validation folds
    pub folds: usize,
    pub c_values: Vec<f64>,
    pub gamma_values: Vec<f64>,
    /// Directory receiving the PNG plots
    pub output_dir: PathBuf,
    pub plots: bool,
    /// SMO stopping tolerance
    pub epsilon: f64,
    pub max_iterations: usize,
    /// Kernel rows cached per binary solve
    pub cache_rows: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            data_path: PathBuf::from("iris.data"),
            seed: 1,
            test_size: 0.2,
            folds: 5,
            c_values: DEFAULT_C_VALUES.to_vec(),
            gamma_values: DEFAULT_GAMMA_VALUES.to_vec(),
            output_dir: PathBuf::from("."),
            plots: true,
            epsilon: solver.epsilon,
            max_iterations: solver.max_iterations,
            cache_rows: solver.cache_rows,
        }
    }
}

impl ExperimentConfig {
    /// Read a JSON configuration; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(IrisError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.folds < 2 {
            return Err(IrisError::InvalidParameter(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(IrisError::InvalidParameter(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(IrisError::InvalidParameter(
                "max_iterations must be positive".to_string(),
            ));
        }
        self.param_grid().map(|_| ())
    }

    pub fn param_grid(&self) -> Result<ParamGrid> {
        ParamGrid::new(self.c_values.clone(), self.gamma_values.clone())
    }

    /// Solver settings shared by all candidates; C is set per grid point
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
            cache_rows: self.cache_rows,
            ..SolverConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();
        assert_eq!(config.data_path, PathBuf::from("iris.data"));
        assert_eq!(config.seed, 1);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.folds, 5);
        assert_eq!(config.param_grid().unwrap(), ParamGrid::default());
        assert!(config.plots);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ExperimentConfig {
                test_size: 1.0,
                ..Default::default()
            },
            ExperimentConfig {
                folds: 1,
                ..Default::default()
            },
            ExperimentConfig {
                c_values: vec![],
                ..Default::default()
            },
            ExperimentConfig {
                gamma_values: vec![0.1, -1.0],
                ..Default::default()
            },
            ExperimentConfig {
                epsilon: 0.0,
                ..Default::default()
            },
        ];
        for config in &bad {
            assert!(matches!(
                config.validate(),
                Err(IrisError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "c_values": [1.0, 10.0], "plots": false}}"#).unwrap();
        file.flush().unwrap();

        let config = ExperimentConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.c_values, vec![1.0, 10.0]);
        assert!(!config.plots);
        assert_eq!(config.folds, 5);
        assert_eq!(config.gamma_values, DEFAULT_GAMMA_VALUES.to_vec());
    }

    #[test]
    fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            ExperimentConfig::from_file(file.path()),
            Err(IrisError::JsonError(_))
        ));
    }

    #[test]
    fn test_solver_config() {
        let config = ExperimentConfig {
            epsilon: 1e-4,
            cache_rows: 64,
            ..Default::default()
        };
        let solver = config.solver_config();
        assert_eq!(solver.epsilon, 1e-4);
        assert_eq!(solver.cache_rows, 64);
        assert_eq!(solver.max_iterations, config.max_iterations);
    }
}
