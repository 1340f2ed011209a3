//! Stratified train/test splitting and k-fold cross-validation indices

use crate::core::{class_counts, IrisError, Result, Sample};
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Result of a train/test split
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
    /// Positions of the training rows in the input
    pub train_indices: Vec<usize>,
    /// Positions of the test rows in the input
    pub test_indices: Vec<usize>,
}

/// Split `samples` into stratified train and test subsets
///
/// `ceil(test_size * n)` rows go to the test subset. Each class contributes in
/// proportion to its size; leftover test slots go to the classes with the
/// largest fractional share, lowest class code first on ties.
pub fn train_test_split(samples: &[Sample], test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if samples.is_empty() {
        return Err(IrisError::EmptyDataset);
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(IrisError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n = samples.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n - n_test;

    let counts = class_counts(samples);
    let classes: Vec<usize> = (0..counts.len()).filter(|&k| counts[k] > 0).collect();

    if let Some(&k) = classes.iter().find(|&&k| counts[k] < 2) {
        return Err(IrisError::InsufficientSamples(format!(
            "class {} has {} member(s); at least 2 are needed to stratify",
            k, counts[k]
        )));
    }
    if n_test < classes.len() || n_train < classes.len() {
        return Err(IrisError::InvalidParameter(format!(
            "train size {} and test size {} must both be at least the number of classes {}",
            n_train,
            n_test,
            classes.len()
        )));
    }

    let allocation = allocate_test_rows(&counts, &classes, n_test, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(n_train);
    let mut test_indices = Vec::with_capacity(n_test);

    for &k in &classes {
        let mut members = indices_of_class(samples, k);
        members.shuffle(&mut rng);
        let (test, train) = members.split_at(allocation[k]);
        test_indices.extend_from_slice(test);
        train_indices.extend_from_slice(train);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    Ok(TrainTestSplit {
        train: train_indices.iter().map(|&i| samples[i].clone()).collect(),
        test: test_indices.iter().map(|&i| samples[i].clone()).collect(),
        train_indices,
        test_indices,
    })
}

/// Test rows per class code: floor of the proportional share, remainder by
/// largest fractional part
fn allocate_test_rows(counts: &[usize], classes: &[usize], n_test: usize, n: usize) -> Vec<usize> {
    let mut allocation = vec![0; counts.len()];
    for &k in classes {
        allocation[k] = n_test * counts[k] / n;
    }

    let assigned: usize = allocation.iter().sum();
    let mut by_remainder = classes.to_vec();
    // Stable sort keeps class-code order among equal remainders
    by_remainder.sort_by(|&a, &b| {
        let ra = (n_test * counts[a]) % n;
        let rb = (n_test * counts[b]) % n;
        rb.cmp(&ra)
    });
    for &k in by_remainder.iter().take(n_test - assigned) {
        allocation[k] += 1;
    }

    allocation
}

fn indices_of_class(samples: &[Sample], class: usize) -> Vec<usize> {
    samples
        .iter()
        .enumerate()
        .filter(|(_, s)| s.label == class)
        .map(|(i, _)| i)
        .collect()
}

/// Train/validation row positions for one cross-validation fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Stratified k-fold splitter
///
/// Rows of each class are (optionally) shuffled and dealt round-robin over the
/// folds, the deal continuing from class to class, so fold sizes differ by at
/// most one and every class is spread evenly.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: u64,
}

impl StratifiedKFold {
    /// Shuffling splitter with `n_splits` folds
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Compute the folds for `samples`; indices are sorted ascending
    pub fn split(&self, samples: &[Sample]) -> Result<Vec<Fold>> {
        if self.n_splits < 2 {
            return Err(IrisError::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if samples.len() < self.n_splits {
            return Err(IrisError::InsufficientSamples(format!(
                "cannot split {} samples into {} folds",
                samples.len(),
                self.n_splits
            )));
        }

        let counts = class_counts(samples);
        let classes: Vec<usize> = (0..counts.len()).filter(|&k| counts[k] > 0).collect();

        if classes.iter().all(|&k| counts[k] < self.n_splits) {
            return Err(IrisError::InsufficientSamples(format!(
                "n_splits = {} is greater than the number of members in every class",
                self.n_splits
            )));
        }
        if let Some(&k) = classes.iter().find(|&&k| counts[k] < self.n_splits) {
            warn!(
                "The least populated class ({}) has only {} members, fewer than n_splits = {}",
                k, counts[k], self.n_splits
            );
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut members_of_fold = vec![Vec::new(); self.n_splits];
        let mut dealt = 0;

        for &k in &classes {
            let mut members = indices_of_class(samples, k);
            if self.shuffle {
                members.shuffle(&mut rng);
            }
            for i in members {
                members_of_fold[dealt % self.n_splits].push(i);
                dealt += 1;
            }
        }

        let mut fold_of = vec![0; samples.len()];
        for (f, members) in members_of_fold.iter().enumerate() {
            for &i in members {
                fold_of[i] = f;
            }
        }

        Ok((0..self.n_splits)
            .map(|f| {
                let (validation, train): (Vec<usize>, Vec<usize>) =
                    (0..samples.len()).partition(|&i| fold_of[i] == f);
                Fold { train, validation }
            })
            .collect())
    }
}
