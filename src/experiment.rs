//! The end-to-end experiment: load, split, search, evaluate, plot
//!
//! `run` stops at the evaluated report; `render_plots` writes the PNG files
//! afterwards.

use crate::config::ExperimentConfig;
use crate::core::{Estimator, Predictor, Result, Sample};
use crate::data::{train_test_split, IrisDataset, StratifiedKFold, TrainTestSplit, FEATURE_NAMES};
use crate::metrics::{accuracy_score, confusion_matrix, f1_score_macro, ClassificationReport};
use crate::model_selection::GridSearchCV;
use crate::pipeline::Pipeline;
use crate::report::{ExperimentReport, RunMetadata};
use crate::viz::{
    plot_confusion_matrix, plot_decision_boundary, DecisionSurface, CONFUSION_MATRIX_FILE,
    DECISION_BOUNDARY_FILE,
};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Feature columns of the two-dimensional refit (petal length, petal width)
pub const PLOT_FEATURES: [usize; 2] = [2, 3];

/// Mesh points per axis of the decision surface
pub const MESH_RESOLUTION: usize = 100;

/// Extension of the mesh beyond the data on each side
pub const MESH_MARGIN: f64 = 1.0;

/// Load the data and make the seeded stratified split
fn load_and_split(config: &ExperimentConfig) -> Result<(IrisDataset, TrainTestSplit)> {
    info!("Loading dataset from {}", config.data_path.display());
    let dataset = IrisDataset::from_file(&config.data_path)?;
    info!(
        "Loaded {} samples, class counts {:?}",
        dataset.len(),
        dataset.class_counts()
    );

    let split = train_test_split(dataset.samples(), config.test_size, config.seed)?;
    info!("Split into {} train / {} test samples", split.train.len(), split.test.len());
    Ok((dataset, split))
}

/// Search, refit and evaluate; the returned report lists no plots
pub fn run(config: &ExperimentConfig) -> Result<ExperimentReport> {
    config.validate()?;

    let (dataset, split) = load_and_split(config)?;
    let n_classes = dataset.n_classes();

    let solver = config.solver_config();
    let search = GridSearchCV::new(
        config.param_grid()?,
        StratifiedKFold::new(config.folds, config.seed),
    )
    .with_solver_config(solver);
    let result = search.fit(&split.train)?;
    debug!("Refitted model: {:?}", result.best_estimator.model().info());

    let y_true: Vec<usize> = split.test.iter().map(|s| s.label).collect();
    let y_pred = result.best_estimator.predict_batch(&split.test);
    let test_accuracy = accuracy_score(&y_true, &y_pred)?;
    let macro_f1 = f1_score_macro(&y_true, &y_pred, n_classes)?;
    let matrix = confusion_matrix(&y_true, &y_pred, n_classes)?;
    info!("Test accuracy {:.3}, macro-F1 {:.3}", test_accuracy, macro_f1);

    let mut support_vectors_per_class = result.best_estimator.n_support().to_vec();
    support_vectors_per_class.resize(n_classes, 0);

    Ok(ExperimentReport {
        metadata: RunMetadata::new(config.seed, &config.data_path),
        class_names: dataset.class_names().to_vec(),
        n_train: split.train.len(),
        n_test: split.test.len(),
        best_params: result.best_params,
        best_cv_score: result.best_score,
        test_accuracy,
        macro_f1,
        classification_report: ClassificationReport::from_confusion_matrix(
            &matrix,
            dataset.class_names(),
        ),
        confusion_matrix: matrix,
        support_vectors_per_class,
        cv_results: result.cv_results,
        plots: Vec::new(),
    })
}

/// Refit `report.best_params` on the two plot features of the training rows
/// and write both PNG files into `config.output_dir`.
///
/// The training rows come from repeating the seeded split of `run`.
pub fn render_plots(config: &ExperimentConfig, report: &ExperimentReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.output_dir)?;

    let (dataset, split) = load_and_split(config)?;
    let class_names = dataset.class_names();

    let projected: Vec<Sample> = split.train.iter().map(|s| s.select(&PLOT_FEATURES)).collect();
    let model = Pipeline::from_params(&report.best_params, &config.solver_config()).fit(&projected)?;
    let surface = DecisionSurface::compute(&model, &projected, MESH_RESOLUTION, MESH_MARGIN)?;

    let boundary_path = config.output_dir.join(DECISION_BOUNDARY_FILE);
    plot_decision_boundary(
        &surface,
        &projected,
        class_names,
        (FEATURE_NAMES[PLOT_FEATURES[0]], FEATURE_NAMES[PLOT_FEATURES[1]]),
        &boundary_path,
    )?;
    info!("Wrote {}", boundary_path.display());

    let matrix_path = config.output_dir.join(CONFUSION_MATRIX_FILE);
    plot_confusion_matrix(&report.confusion_matrix, class_names, &matrix_path)?;
    info!("Wrote {}", matrix_path.display());

    Ok(vec![boundary_path, matrix_path])
}
