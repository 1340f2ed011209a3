//! Cross-validated scoring

use crate::core::{Estimator, Predictor, Result, Sample};
use crate::data::Fold;
use crate::metrics::accuracy_score;

/// Accuracy of `estimator` on each fold's validation rows after fitting on
/// the fold's training rows
pub fn cross_val_score<E: Estimator>(
    estimator: &E,
    samples: &[Sample],
    folds: &[Fold],
) -> Result<Vec<f64>> {
    folds
        .iter()
        .map(|fold| {
            let train: Vec<Sample> = fold.train.iter().map(|&i| samples[i].clone()).collect();
            let validation: Vec<Sample> =
                fold.validation.iter().map(|&i| samples[i].clone()).collect();

            let fitted = estimator.fit(&train)?;
            let predicted = fitted.predict_batch(&validation);
            let actual: Vec<usize> = validation.iter().map(|s| s.label).collect();
            accuracy_score(&actual, &predicted)
        })
        .collect()
}
