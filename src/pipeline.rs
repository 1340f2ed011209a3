//! Standardize-then-classify pipeline

use crate::api::{TrainedSVC, SVC};
use crate::core::{Estimator, Predictor, Result, Sample, SolverConfig, SvcParams};
use crate::kernel::{Kernel, RBFKernel};
use crate::utils::scaling::StandardScaler;

/// A `StandardScaler` followed by an `SVC`
///
/// The scaler is learned from the rows handed to `fit` and nothing else.
pub struct Pipeline<K: Kernel = RBFKernel> {
    svc: SVC<K>,
}

impl<K: Kernel> Clone for Pipeline<K> {
    fn clone(&self) -> Self {
        Self {
            svc: self.svc.clone(),
        }
    }
}

impl Pipeline<RBFKernel> {
    /// RBF pipeline for one grid point
    pub fn from_params(params: &SvcParams, solver: &SolverConfig) -> Self {
        Self::new(SVC::from_params(params).with_solver_config(solver.clone()))
    }
}

impl<K: Kernel> Pipeline<K> {
    pub fn new(svc: SVC<K>) -> Self {
        Self { svc }
    }

    pub fn svc(&self) -> &SVC<K> {
        &self.svc
    }
}

impl<K: Kernel> Estimator for Pipeline<K> {
    type Fitted = FittedPipeline<K>;

    fn fit(&self, samples: &[Sample]) -> Result<FittedPipeline<K>> {
        let scaler = StandardScaler::fit(samples)?;
        let model = self.svc.fit(&scaler.transform(samples))?;
        Ok(FittedPipeline { scaler, model })
    }
}

/// Fitted scaler and classifier
pub struct FittedPipeline<K: Kernel = RBFKernel> {
    scaler: StandardScaler,
    model: TrainedSVC<K>,
}

impl<K: Kernel> FittedPipeline<K> {
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &TrainedSVC<K> {
        &self.model
    }

    /// Support vectors per class code
    pub fn n_support(&self) -> &[usize] {
        self.model.n_support()
    }
}

impl<K: Kernel> Predictor for FittedPipeline<K> {
    fn predict(&self, features: &[f64]) -> usize {
        self.model.predict(&self.scaler.transform_features(features))
    }

    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two classes far apart on a large-scale first feature
    fn unscaled() -> Vec<Sample> {
        let mut samples = Vec::new();
        for i in 0..6 {
            let jitter = i as f64 * 0.1;
            samples.push(Sample::new(vec![1000.0 + 10.0 * jitter, jitter], 0));
            samples.push(Sample::new(vec![2000.0 + 10.0 * jitter, 1.0 + jitter], 1));
        }
        samples
    }

    #[test]
    fn test_pipeline_fit_predict() {
        let samples = unscaled();
        let pipeline = Pipeline::from_params(&SvcParams::new(10.0, 0.1), &SolverConfig::default());
        let fitted = pipeline.fit(&samples).unwrap();

        let expected: Vec<usize> = samples.iter().map(|s| s.label).collect();
        assert_eq!(fitted.predict_batch(&samples), expected);
        assert_eq!(fitted.predict(&[1020.0, 0.2]), 0);
        assert_eq!(fitted.predict(&[1980.0, 1.3]), 1);
        assert_eq!(fitted.n_features(), 2);
        assert_eq!(fitted.n_support().len(), 2);
    }

    #[test]
    fn test_scaler_learned_from_fit_rows_only() {
        let samples = unscaled();
        let (train, holdout) = samples.split_at(8);
        let pipeline = Pipeline::from_params(&SvcParams::new(1.0, 0.1), &SolverConfig::default());

        let fitted = pipeline.fit(train).unwrap();
        let direct = StandardScaler::fit(train).unwrap();
        assert_eq!(fitted.scaler(), &direct);

        // Predicting unseen rows leaves the scaler untouched
        let _ = fitted.predict_batch(holdout);
        assert_relative_eq!(fitted.scaler().mean()[0], direct.mean()[0]);
    }

    #[test]
    fn test_from_params_carries_solver_settings() {
        let solver = SolverConfig {
            epsilon: 1e-5,
            ..SolverConfig::default()
        };
        let pipeline = Pipeline::from_params(&SvcParams::new(100.0, 0.01), &solver);
        assert_eq!(pipeline.svc().config().c, 100.0);
        assert_eq!(pipeline.svc().config().epsilon, 1e-5);
        assert_eq!(pipeline.svc().kernel().gamma(), 0.01);
    }
}
