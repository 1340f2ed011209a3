//! Data loading, label encoding and stratified splitting

pub mod iris;
pub mod split;

pub use self::iris::{IrisDataset, LabelEncoder, FEATURE_NAMES, NUM_FEATURES};
pub use self::split::{train_test_split, Fold, StratifiedKFold, TrainTestSplit};
