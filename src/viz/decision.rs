//! Decision-region plot for a two-feature classifier

use super::{class_color, plot_error};
use crate::core::{IrisError, Predictor, Result, Sample};
use plotters::prelude::*;
use std::path::Path;

pub const DECISION_BOUNDARY_TITLE: &str = "SVM Decision Boundary (Petal Length vs Petal Width)";

/// Predicted class over a regular mesh covering the data
#[derive(Debug, Clone)]
pub struct DecisionSurface {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Row-major: `labels[j * xs.len() + i]` is the class at `(xs[i], ys[j])`
    labels: Vec<usize>,
}

impl DecisionSurface {
    /// Evaluate `model` on a `resolution` x `resolution` mesh spanning each
    /// axis' range in `points`, extended by `margin` on both sides
    pub fn compute<P: Predictor>(
        model: &P,
        points: &[Sample],
        resolution: usize,
        margin: f64,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(IrisError::EmptyDataset);
        }
        if let Some(bad) = points.iter().find(|p| p.dim() != 2) {
            return Err(IrisError::DimensionMismatch {
                expected: 2,
                actual: bad.dim(),
            });
        }
        if resolution < 2 {
            return Err(IrisError::InvalidParameter(format!(
                "mesh resolution must be at least 2, got {}",
                resolution
            )));
        }

        let (x_min, x_max) = axis_range(points, 0);
        let (y_min, y_max) = axis_range(points, 1);
        let xs = linspace(x_min - margin, x_max + margin, resolution);
        let ys = linspace(y_min - margin, y_max + margin, resolution);

        let mut labels = Vec::with_capacity(resolution * resolution);
        for &y in &ys {
            for &x in &xs {
                labels.push(model.predict(&[x, y]));
            }
        }

        Ok(Self { xs, ys, labels })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Class predicted at mesh point `(xs[i], ys[j])`
    pub fn label_at(&self, i: usize, j: usize) -> usize {
        self.labels[j * self.xs.len() + i]
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }
}

fn axis_range(points: &[Sample], axis: usize) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.features[axis]), hi.max(p.features[axis]))
    })
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Closed cell `[v - step/2, v + step/2]` around mesh value `k`, clipped to the axis range
fn cell_bounds(values: &[f64], k: usize) -> (f64, f64) {
    let half = (values[1] - values[0]) / 2.0;
    let lo = values[0];
    let hi = values[values.len() - 1];
    ((values[k] - half).max(lo), (values[k] + half).min(hi))
}

/// Render the mesh as translucent class regions with `points` on top
pub fn plot_decision_boundary(
    surface: &DecisionSurface,
    points: &[Sample],
    class_names: &[String],
    axis_labels: (&str, &str),
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let (x_min, x_max) = surface.x_range();
    let (y_min, y_max) = surface.y_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(DECISION_BOUNDARY_TITLE, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(axis_labels.0)
        .y_desc(axis_labels.1)
        .draw()
        .map_err(plot_error)?;

    let n_x = surface.xs().len();
    let cells = surface.labels().iter().enumerate().map(|(idx, &label)| {
        let (x0, x1) = cell_bounds(surface.xs(), idx % n_x);
        let (y0, y1) = cell_bounds(surface.ys(), idx / n_x);
        Rectangle::new([(x0, y0), (x1, y1)], class_color(label).mix(0.3).filled())
    });
    chart.draw_series(cells).map_err(plot_error)?;

    let n_classes = points.iter().map(|p| p.label + 1).max().unwrap_or(0);
    for class in 0..n_classes {
        let color = class_color(class);
        let members: Vec<(f64, f64)> = points
            .iter()
            .filter(|p| p.label == class)
            .map(|p| (p.features[0], p.features[1]))
            .collect();
        if members.is_empty() {
            continue;
        }

        let name = class_names
            .get(class)
            .cloned()
            .unwrap_or_else(|| class.to_string());
        chart
            .draw_series(
                members
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
            )
            .map_err(plot_error)?
            .label(name)
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        chart
            .draw_series(
                members
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, BLACK.stroke_width(1))),
            )
            .map_err(plot_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Class 1 right of x = 0, class 0 elsewhere
    struct Threshold;

    impl Predictor for Threshold {
        fn predict(&self, features: &[f64]) -> usize {
            usize::from(features[0] > 0.0)
        }

        fn n_features(&self) -> usize {
            2
        }
    }

    fn points() -> Vec<Sample> {
        vec![
            Sample::new(vec![-2.0, 0.0], 0),
            Sample::new(vec![2.0, 1.0], 1),
            Sample::new(vec![0.5, 3.0], 1),
        ]
    }

    #[test]
    fn test_mesh_extends_range_by_margin() {
        let surface = DecisionSurface::compute(&Threshold, &points(), 100, 1.0).unwrap();

        assert_eq!(surface.xs().len(), 100);
        assert_eq!(surface.ys().len(), 100);
        assert_eq!(surface.labels().len(), 100 * 100);

        let (x_min, x_max) = surface.x_range();
        let (y_min, y_max) = surface.y_range();
        assert_relative_eq!(x_min, -3.0);
        assert_relative_eq!(x_max, 3.0, epsilon = 1e-12);
        assert_relative_eq!(y_min, -1.0);
        assert_relative_eq!(y_max, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh_labels_follow_model() {
        let surface = DecisionSurface::compute(&Threshold, &points(), 5, 0.0).unwrap();
        // xs = -2, -1, 0, 1, 2
        for j in 0..5 {
            assert_eq!(surface.label_at(0, j), 0);
            assert_eq!(surface.label_at(2, j), 0);
            assert_eq!(surface.label_at(3, j), 1);
            assert_eq!(surface.label_at(4, j), 1);
        }
    }

    #[test]
    fn test_cell_bounds_clamped() {
        let values = [0.0, 1.0, 2.0];
        assert_eq!(cell_bounds(&values, 0), (0.0, 0.5));
        assert_eq!(cell_bounds(&values, 1), (0.5, 1.5));
        assert_eq!(cell_bounds(&values, 2), (1.5, 2.0));
    }

    #[test]
    fn test_compute_rejects_bad_input() {
        assert!(matches!(
            DecisionSurface::compute(&Threshold, &[], 10, 1.0),
            Err(IrisError::EmptyDataset)
        ));
        let three_d = vec![Sample::new(vec![0.0, 0.0, 0.0], 0)];
        assert!(matches!(
            DecisionSurface::compute(&Threshold, &three_d, 10, 1.0),
            Err(IrisError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            DecisionSurface::compute(&Threshold, &points(), 1, 1.0),
            Err(IrisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_plot_decision_boundary_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("surface.png");
        let surface = DecisionSurface::compute(&Threshold, &points(), 20, 1.0).unwrap();
        let names = vec!["left".to_string(), "right".to_string()];

        plot_decision_boundary(&surface, &points(), &names, ("x", "y"), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
