//! Exhaustive (C, gamma) search scored by stratified cross-validation

use super::cv::cross_val_score;
use crate::core::{Estimator, IrisError, Result, Sample, SolverConfig, SvcParams};
use crate::data::StratifiedKFold;
use crate::pipeline::{FittedPipeline, Pipeline};
use crate::utils::stats;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Default regularization candidates
pub const DEFAULT_C_VALUES: [f64; 4] = [0.1, 1.0, 10.0, 100.0];

/// Default RBF width candidates
pub const DEFAULT_GAMMA_VALUES: [f64; 4] = [1e-3, 1e-2, 1e-1, 1.0];

/// Cartesian product of C and gamma candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    c_values: Vec<f64>,
    gamma_values: Vec<f64>,
}

impl ParamGrid {
    /// Both lists must be non-empty with positive, finite entries
    pub fn new(c_values: Vec<f64>, gamma_values: Vec<f64>) -> Result<Self> {
        check_candidates("C", &c_values)?;
        check_candidates("gamma", &gamma_values)?;
        Ok(Self {
            c_values,
            gamma_values,
        })
    }

    pub fn c_values(&self) -> &[f64] {
        &self.c_values
    }

    pub fn gamma_values(&self) -> &[f64] {
        &self.gamma_values
    }

    /// Grid points with C as the outer loop and gamma as the inner loop
    pub fn iter(&self) -> impl Iterator<Item = SvcParams> + '_ {
        self.c_values
            .iter()
            .flat_map(move |&c| self.gamma_values.iter().map(move |&gamma| SvcParams::new(c, gamma)))
    }

    pub fn len(&self) -> usize {
        self.c_values.len() * self.gamma_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            c_values: DEFAULT_C_VALUES.to_vec(),
            gamma_values: DEFAULT_GAMMA_VALUES.to_vec(),
        }
    }
}

fn check_candidates(name: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(IrisError::InvalidParameter(format!(
            "{} candidate list is empty",
            name
        )));
    }
    if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(IrisError::InvalidParameter(format!(
            "{} candidates must be positive, got {}",
            name, bad
        )));
    }
    Ok(())
}

/// Cross-validation outcome of one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub params: SvcParams,
    /// Validation accuracy per fold
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
    /// 1 for the best mean score; tied candidates share the lowest rank
    pub rank: usize,
}

/// Per-candidate results in grid enumeration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CvResults {
    candidates: Vec<CandidateResult>,
}

impl CvResults {
    fn from_scores(scored: Vec<(SvcParams, Vec<f64>)>) -> Self {
        let means: Vec<f64> = scored.iter().map(|(_, s)| stats::mean(s)).collect();
        let ranks = stats::rank_descending(&means);

        let candidates = scored
            .into_iter()
            .zip(means)
            .zip(ranks)
            .map(|(((params, fold_scores), mean_score), rank)| CandidateResult {
                params,
                std_score: stats::std_dev(&fold_scores),
                fold_scores,
                mean_score,
                rank,
            })
            .collect();

        Self { candidates }
    }

    /// First candidate with the highest mean score
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, candidate) in self.candidates.iter().enumerate() {
            match best {
                Some(b) if candidate.mean_score <= self.candidates[b].mean_score => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn candidates(&self) -> &[CandidateResult] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Grid search over RBF pipelines
#[derive(Debug, Clone)]
pub struct GridSearchCV {
    grid: ParamGrid,
    cv: StratifiedKFold,
    solver: SolverConfig,
}

/// Outcome of a grid search, including the winner refitted on all rows
pub struct GridSearchResult {
    pub best_params: SvcParams,
    pub best_score: f64,
    pub best_index: usize,
    pub cv_results: CvResults,
    pub best_estimator: FittedPipeline,
}

impl GridSearchCV {
    pub fn new(grid: ParamGrid, cv: StratifiedKFold) -> Self {
        Self {
            grid,
            cv,
            solver: SolverConfig::default(),
        }
    }

    /// Solver settings shared by every candidate (C comes from the grid)
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn grid(&self) -> &ParamGrid {
        &self.grid
    }

    /// Score every grid point on the folds of `train`, then refit the best
    /// one on all of `train`
    pub fn fit(&self, train: &[Sample]) -> Result<GridSearchResult> {
        let folds = self.cv.split(train)?;
        info!(
            "Grid search: {} candidates x {} folds on {} samples",
            self.grid.len(),
            folds.len(),
            train.len()
        );

        let mut scored = Vec::with_capacity(self.grid.len());
        for params in self.grid.iter() {
            let pipeline = Pipeline::from_params(&params, &self.solver);
            let scores = cross_val_score(&pipeline, train, &folds)?;
            debug!(
                "{}: mean accuracy {:.4} (folds {:?})",
                params,
                stats::mean(&scores),
                scores
            );
            scored.push((params, scores));
        }

        let cv_results = CvResults::from_scores(scored);
        let best_index = cv_results.best_index().ok_or_else(|| {
            IrisError::InvalidParameter("parameter grid is empty".to_string())
        })?;
        let best = &cv_results.candidates()[best_index];
        let best_params = best.params;
        let best_score = best.mean_score;
        info!("Best parameters {} with CV accuracy {:.4}", best_params, best_score);

        let best_estimator = Pipeline::from_params(&best_params, &self.solver).fit(train)?;

        Ok(GridSearchResult {
            best_params,
            best_score,
            best_index,
            cv_results,
            best_estimator,
        })
    }
}
