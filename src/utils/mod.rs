//! Utility functions for preprocessing and summary statistics

use crate::core::{IrisError, Result, Sample};

/// Feature scaling utilities
pub mod scaling {
    use super::*;
    use serde::{Deserialize, Serialize};

    /// Scales below this are treated as zero variance and replaced by 1
    const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

    /// Zero-mean, unit-variance feature scaling
    ///
    /// Statistics are population statistics (divisor `n`). A constant feature
    /// keeps scale 1 so it is only centred.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StandardScaler {
        mean: Vec<f64>,
        variance: Vec<f64>,
        scale: Vec<f64>,
    }

    impl StandardScaler {
        /// Compute per-feature mean and variance from training samples
        pub fn fit(samples: &[Sample]) -> Result<Self> {
            let first = samples.first().ok_or(IrisError::EmptyDataset)?;
            let dim = first.dim();
            let n = samples.len() as f64;

            let mut mean = vec![0.0; dim];
            for sample in samples {
                if sample.dim() != dim {
                    return Err(IrisError::DimensionMismatch {
                        expected: dim,
                        actual: sample.dim(),
                    });
                }
                for (m, &value) in mean.iter_mut().zip(&sample.features) {
                    *m += value;
                }
            }
            mean.iter_mut().for_each(|m| *m /= n);

            let mut variance = vec![0.0; dim];
            for sample in samples {
                for ((v, &value), m) in variance.iter_mut().zip(&sample.features).zip(&mean) {
                    *v += (value - m).powi(2);
                }
            }
            variance.iter_mut().for_each(|v| *v /= n);

            let scale = variance
                .iter()
                .map(|v| {
                    let std = v.sqrt();
                    if std < MIN_SCALE {
                        1.0
                    } else {
                        std
                    }
                })
                .collect();

            Ok(Self {
                mean,
                variance,
                scale,
            })
        }

        /// Transform one feature vector with the fitted parameters
        pub fn transform_features(&self, features: &[f64]) -> Vec<f64> {
            features
                .iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect()
        }

        /// Transform a single sample using fitted parameters
        pub fn transform_sample(&self, sample: &Sample) -> Sample {
            Sample::new(self.transform_features(&sample.features), sample.label)
        }

        /// Transform multiple samples
        pub fn transform(&self, samples: &[Sample]) -> Vec<Sample> {
            samples.iter().map(|s| self.transform_sample(s)).collect()
        }

        pub fn mean(&self) -> &[f64] {
            &self.mean
        }

        pub fn variance(&self) -> &[f64] {
            &self.variance
        }

        /// Per-feature divisor (standard deviation, or 1 for constant features)
        pub fn scale(&self) -> &[f64] {
            &self.scale
        }

        /// Number of features seen during fit
        pub fn n_features(&self) -> usize {
            self.mean.len()
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(samples: &[Sample]) -> Result<(Vec<Sample>, StandardScaler)> {
        let scaler = StandardScaler::fit(samples)?;
        let transformed = scaler.transform(samples);
        Ok((transformed, scaler))
    }
}

/// Summary statistics over score vectors
pub mod stats {
    /// Arithmetic mean; 0 for an empty slice
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Population standard deviation; 0 for an empty slice
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let m = mean(values);
        let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }

    /// Ranks with ties sharing the lowest rank ("min" method), highest value ranked 1
    pub fn rank_descending(values: &[f64]) -> Vec<usize> {
        values
            .iter()
            .map(|v| 1 + values.iter().filter(|other| *other > v).count())
            .collect()
    }
}
