//! Confusion-matrix heatmap

use super::plot_error;
use crate::core::Result;
use crate::metrics::ConfusionMatrix;
use plotters::prelude::*;
use std::path::Path;

pub const CONFUSION_MATRIX_TITLE: &str = "Confusion Matrix (Test Set)";

const CELL_SIZE: i32 = 160;
const LEFT: i32 = 180;
const TOP: i32 = 90;

/// Fill colour for a row-normalized fraction in [0, 1]
fn cell_color(fraction: f64) -> RGBColor {
    let intensity = (fraction.clamp(0.0, 1.0) * 200.0) as u8;
    RGBColor(255 - intensity, 255 - intensity, 255)
}

/// Draw `matrix` with row-normalized shading, each cell labelled with its
/// fraction and raw count
pub fn plot_confusion_matrix(
    matrix: &ConfusionMatrix,
    class_names: &[String],
    path: &Path,
) -> Result<()> {
    let n = matrix.n_classes() as i32;
    let width = (LEFT + n * CELL_SIZE + 40) as u32;
    let height = (TOP + n * CELL_SIZE + 120) as u32;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let title_style = TextStyle::from(("sans-serif", 32).into_font()).color(&BLACK);
    let label_style = TextStyle::from(("sans-serif", 20).into_font()).color(&BLACK);
    let cell_style = TextStyle::from(("sans-serif", 24).into_font()).color(&BLACK);

    root.draw_text(CONFUSION_MATRIX_TITLE, &title_style, (LEFT, 25))
        .map_err(plot_error)?;

    let normalized = matrix.normalized();
    for (actual, row) in normalized.iter().enumerate() {
        for (predicted, &fraction) in row.iter().enumerate() {
            let x = LEFT + predicted as i32 * CELL_SIZE;
            let y = TOP + actual as i32 * CELL_SIZE;
            let corners = [(x, y), (x + CELL_SIZE, y + CELL_SIZE)];

            root.draw(&Rectangle::new(corners, cell_color(fraction).filled()))
                .map_err(plot_error)?;
            root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))
                .map_err(plot_error)?;

            let center_x = x + CELL_SIZE / 2 - 30;
            let center_y = y + CELL_SIZE / 2;
            root.draw_text(&format!("{:.2}", fraction), &cell_style, (center_x, center_y - 28))
                .map_err(plot_error)?;
            root.draw_text(
                &format!("({})", matrix.get(actual, predicted)),
                &cell_style,
                (center_x, center_y + 4),
            )
            .map_err(plot_error)?;
        }
    }

    for (k, name) in class_names.iter().enumerate().take(n as usize) {
        let offset = k as i32 * CELL_SIZE + CELL_SIZE / 2;
        root.draw_text(name, &label_style, (10, TOP + offset - 10))
            .map_err(plot_error)?;
        root.draw_text(name, &label_style, (LEFT + offset - 60, TOP + n * CELL_SIZE + 15))
            .map_err(plot_error)?;
    }

    root.draw_text("True label", &label_style, (10, TOP - 30))
        .map_err(plot_error)?;
    root.draw_text(
        "Predicted label",
        &label_style,
        (LEFT + n * CELL_SIZE / 2 - 70, TOP + n * CELL_SIZE + 60),
    )
    .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}
