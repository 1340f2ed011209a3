//! Iris dataset loading
//!
//! Reads the UCI `iris.data` layout: header-less, comma-delimited rows of
//! four measurements followed by the species name.
//!
//! ```text
//! 5.1,3.5,1.4,0.2,Iris-setosa
//! 7.0,3.2,4.7,1.4,Iris-versicolor
//! ```

use crate::core::{class_counts, IrisError, Result, Sample};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The number of features in the Iris dataset
pub const NUM_FEATURES: usize = 4;

/// Feature names in column order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// A single record from the Iris dataset
#[derive(Debug, Deserialize)]
struct IrisRecord {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    species: String,
}

impl IrisRecord {
    fn features(&self) -> Vec<f64> {
        vec![
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

/// Maps class names to integer codes in sorted lexicographic order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn one code per distinct label
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        Self {
            classes: classes.into_iter().map(String::from).collect(),
        }
    }

    /// Code of `label`
    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| IrisError::UnknownLabel(label.to_string()))
    }

    /// Name of class `code`, if it exists
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Class names indexed by code
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

/// In-memory Iris table: encoded samples plus the class-name table
#[derive(Debug, Clone)]
pub struct IrisDataset {
    samples: Vec<Sample>,
    encoder: LabelEncoder,
}

impl IrisDataset {
    /// Load the dataset from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let dataset = Self::from_reader(file)?;
        debug!(
            "Loaded {} samples ({} classes) from {}",
            dataset.len(),
            dataset.n_classes(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Load the dataset from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if is_blank(&record) {
                continue;
            }
            records.push(parse_record(&record)?);
        }

        if records.is_empty() {
            return Err(IrisError::EmptyDataset);
        }

        let species: Vec<&str> = records.iter().map(|r| r.species.as_str()).collect();
        let encoder = LabelEncoder::fit(&species);

        let samples = records
            .iter()
            .map(|r| Ok(Sample::new(r.features(), encoder.transform(&r.species)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { samples, encoder })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Class names indexed by code
    pub fn class_names(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.encoder.n_classes()
    }

    /// Number of samples per class code
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = class_counts(&self.samples);
        counts.resize(self.n_classes(), 0);
        counts
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

fn parse_record(record: &StringRecord) -> Result<IrisRecord> {
    let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

    if record.len() != NUM_FEATURES + 1 {
        return Err(IrisError::ParseError {
            line,
            message: format!(
                "expected {} fields, found {}",
                NUM_FEATURES + 1,
                record.len()
            ),
        });
    }

    record
        .deserialize(None)
        .map_err(|e| IrisError::ParseError {
            line,
            message: e.to_string(),
        })
}
