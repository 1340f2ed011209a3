//! Classification metrics on held-out predictions

use crate::core::{IrisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

fn check_lengths(y_true: &[usize], y_pred: &[usize]) -> Result<()> {
    if y_true.is_empty() {
        return Err(IrisError::EmptyDataset);
    }
    if y_true.len() != y_pred.len() {
        return Err(IrisError::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    Ok(())
}

/// Fraction of exact matches
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Unweighted mean of per-class F1 over the classes that occur in either vector
pub fn f1_score_macro(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Result<f64> {
    Ok(confusion_matrix(y_true, y_pred, n_classes)?.macro_f1())
}

/// Count matrix with rows = true class, columns = predicted class
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Result<ConfusionMatrix> {
    check_lengths(y_true, y_pred)?;
    let mut matrix = ConfusionMatrix::new(n_classes);
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t >= n_classes || p >= n_classes {
            return Err(IrisError::InvalidParameter(format!(
                "label {} out of range for {} classes",
                t.max(p),
                n_classes
            )));
        }
        matrix.counts[t][p] += 1;
    }
    Ok(matrix)
}

/// Square confusion matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// All-zero matrix
    pub fn new(n_classes: usize) -> Self {
        Self {
            counts: vec![vec![0; n_classes]; n_classes],
        }
    }

    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Count of rows of class `actual` predicted as `predicted`
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    /// Number of true samples per class
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Number of predictions per class
    pub fn column_sums(&self) -> Vec<usize> {
        (0..self.n_classes())
            .map(|p| self.counts.iter().map(|row| row[p]).sum())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.row_sums().iter().sum()
    }

    /// Trace over total
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes()).map(|k| self.counts[k][k]).sum();
        correct as f64 / total as f64
    }

    /// Each row divided by its sum; empty rows stay zero
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let sum: usize = row.iter().sum();
                row.iter()
                    .map(|&c| if sum == 0 { 0.0 } else { c as f64 / sum as f64 })
                    .collect()
            })
            .collect()
    }

    /// TP / (TP + FP), 0 when nothing was predicted as `class`
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.column_sums()[class];
        ratio(self.counts[class][class], predicted)
    }

    /// TP / (TP + FN), 0 when `class` has no samples
    pub fn recall(&self, class: usize) -> f64 {
        let actual = self.row_sums()[class];
        ratio(self.counts[class][class], actual)
    }

    /// 2TP / (2TP + FP + FN), 0 when the class never occurs
    pub fn f1(&self, class: usize) -> f64 {
        let tp = self.counts[class][class];
        let fp = self.column_sums()[class] - tp;
        let fn_ = self.row_sums()[class] - tp;
        ratio(2 * tp, 2 * tp + fp + fn_)
    }

    /// Mean F1 over classes that appear as truth or prediction
    pub fn macro_f1(&self) -> f64 {
        let rows = self.row_sums();
        let columns = self.column_sums();
        let present: Vec<usize> = (0..self.n_classes())
            .filter(|&k| rows[k] > 0 || columns[k] > 0)
            .collect();
        if present.is_empty() {
            return 0.0;
        }
        present.iter().map(|&k| self.f1(k)).sum::<f64>() / present.len() as f64
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    /// Bracketed integer grid with right-aligned columns
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        write!(f, "[")?;
        for (i, row) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
            write!(f, "[{}]", cells.join(" "))?;
        }
        write!(f, "]")
    }
}

/// Per-class precision, recall and F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class scores plus accuracy and macro-F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_f1: f64,
}

impl ClassificationReport {
    /// Build from a confusion matrix; classes without a name use their code
    pub fn from_confusion_matrix(matrix: &ConfusionMatrix, class_names: &[String]) -> Self {
        let support = matrix.row_sums();
        let classes = (0..matrix.n_classes())
            .map(|k| ClassMetrics {
                name: class_names
                    .get(k)
                    .cloned()
                    .unwrap_or_else(|| k.to_string()),
                precision: matrix.precision(k),
                recall: matrix.recall(k),
                f1: matrix.f1(k),
                support: support[k],
            })
            .collect();

        Self {
            classes,
            accuracy: matrix.accuracy(),
            macro_f1: matrix.macro_f1(),
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(9);

        writeln!(
            f,
            "{:>name_width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>name_width$} {:>9.3} {:>9.3} {:>9.3} {:>9}",
                class.name, class.precision, class.recall, class.f1, class.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>name_width$} {:>29.3}", "accuracy", self.accuracy)?;
        write!(f, "{:>name_width$} {:>29.3}", "macro f1", self.macro_f1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const Y_TRUE: [usize; 8] = [0, 0, 0, 1, 1, 1, 2, 2];
    const Y_PRED: [usize; 8] = [0, 0, 1, 1, 1, 2, 2, 2];

    #[test]
    fn test_accuracy_score() {
        assert_relative_eq!(accuracy_score(&Y_TRUE, &Y_PRED).unwrap(), 6.0 / 8.0);
        assert_relative_eq!(accuracy_score(&[1, 2], &[1, 2]).unwrap(), 1.0);
    }

    #[test]
    fn test_length_errors() {
        assert!(matches!(
            accuracy_score(&[0, 1], &[0]),
            Err(IrisError::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(accuracy_score(&[], &[]), Err(IrisError::EmptyDataset)));
        assert!(matches!(
            confusion_matrix(&[0, 3], &[0, 0], 3),
            Err(IrisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let matrix = confusion_matrix(&Y_TRUE, &Y_PRED, 3).unwrap();
        assert_eq!(
            matrix.counts(),
            &[vec![2, 1, 0], vec![0, 2, 1], vec![0, 0, 2]]
        );
        assert_eq!(matrix.row_sums(), vec![3, 3, 2]);
        assert_eq!(matrix.column_sums(), vec![2, 3, 3]);
        assert_eq!(matrix.total(), 8);
        assert_relative_eq!(matrix.accuracy(), 0.75);
    }

    #[test]
    fn test_per_class_scores() {
        let matrix = confusion_matrix(&Y_TRUE, &Y_PRED, 3).unwrap();
        assert_relative_eq!(matrix.precision(0), 1.0);
        assert_relative_eq!(matrix.recall(0), 2.0 / 3.0);
        assert_relative_eq!(matrix.f1(0), 0.8);
        assert_relative_eq!(matrix.f1(1), 2.0 / 3.0);
        assert_relative_eq!(matrix.f1(2), 0.8);
    }

    #[test]
    fn test_f1_macro() {
        let f1 = f1_score_macro(&Y_TRUE, &Y_PRED, 3).unwrap();
        assert_relative_eq!(f1, (0.8 + 2.0 / 3.0 + 0.8) / 3.0);
    }

    #[test]
    fn test_f1_macro_ignores_absent_classes_and_zeroes_undefined() {
        // Class 2 never appears; class 1 appears only as a wrong prediction
        let f1 = f1_score_macro(&[0, 0], &[0, 1], 3).unwrap();
        assert_relative_eq!(f1, (2.0 / 3.0 + 0.0) / 2.0);
    }

    #[test]
    fn test_normalized_rows() {
        let matrix = confusion_matrix(&[0, 0, 0, 0, 1], &[0, 0, 0, 1, 1], 3).unwrap();
        let normalized = matrix.normalized();
        assert_relative_eq!(normalized[0][0], 0.75);
        assert_relative_eq!(normalized[0][1], 0.25);
        assert_relative_eq!(normalized[1][1], 1.0);
        assert_eq!(normalized[2], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_display_grid() {
        let mut y_true = vec![0usize; 10];
        y_true.extend([1, 1, 2]);
        let mut y_pred = vec![0usize; 10];
        y_pred.extend([1, 2, 2]);

        let matrix = confusion_matrix(&y_true, &y_pred, 3).unwrap();
        assert_eq!(matrix.to_string(), "[[10  0  0]\n [ 0  1  1]\n [ 0  0  1]]");
    }

    #[test]
    fn test_classification_report() {
        let matrix = confusion_matrix(&Y_TRUE, &Y_PRED, 3).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];
        let report = ClassificationReport::from_confusion_matrix(&matrix, &names);

        assert_eq!(report.classes.len(), 3);
        assert_eq!(report.classes[1].name, "b");
        assert_eq!(report.classes[2].name, "2");
        assert_eq!(report.classes[0].support, 3);
        assert_relative_eq!(report.accuracy, 0.75);
        assert_relative_eq!(report.macro_f1, f1_score_macro(&Y_TRUE, &Y_PRED, 3).unwrap());
        assert!(report.to_string().contains("macro f1"));
    }
}
