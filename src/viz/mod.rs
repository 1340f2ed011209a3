//! PNG rendering of the decision surface and the confusion matrix

pub mod decision;
pub mod heatmap;

pub use self::decision::{plot_decision_boundary, DecisionSurface};
pub use self::heatmap::plot_confusion_matrix;

use crate::core::IrisError;
use plotters::style::RGBColor;

/// Default file name of the decision-region plot
pub const DECISION_BOUNDARY_FILE: &str = "decision_boundary.png";

/// Default file name of the confusion-matrix heatmap
pub const CONFUSION_MATRIX_FILE: &str = "confusion_matrix.png";

/// Class colours, indexed by class code (wraps around)
const CLASS_COLORS: [RGBColor; 3] = [
    RGBColor(68, 1, 84),
    RGBColor(33, 145, 140),
    RGBColor(253, 231, 37),
];

pub(crate) fn class_color(class: usize) -> RGBColor {
    CLASS_COLORS[class % CLASS_COLORS.len()]
}

pub(crate) fn plot_error<E: std::fmt::Display>(err: E) -> IrisError {
    IrisError::PlotError(err.to_string())
}
