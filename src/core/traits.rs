//! Core traits for estimators and fitted models

use crate::core::{Result, Sample};

/// An unfitted model that can be trained on labelled samples
pub trait Estimator {
    /// The trained model produced by `fit`
    type Fitted: Predictor;

    /// Train on the given samples
    fn fit(&self, samples: &[Sample]) -> Result<Self::Fitted>;
}

/// A trained classifier
pub trait Predictor {
    /// Predict the class code of a single feature vector
    fn predict(&self, features: &[f64]) -> usize;

    /// Predict the class codes of many samples
    fn predict_batch(&self, samples: &[Sample]) -> Vec<usize> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Number of features the model was trained on
    fn n_features(&self) -> usize;
}
