//! Iris SVM Command Line Interface
//!
//! Runs the full experiment: stratified split, grid search over (C, gamma)
//! with stratified cross-validation, test-set evaluation and plots.

use clap::Parser;
use env_logger::Env;
use iris_svm::config::ExperimentConfig;
use iris_svm::core::Result;
use iris_svm::experiment;
use log::{error, info};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "iris-svm")]
#[command(about = "RBF-kernel SVM on the Iris dataset with stratified grid search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Input file in UCI iris.data layout [default: iris.data]
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for the split and fold shuffles [default: 1]
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows held out for testing [default: 0.2]
    #[arg(long)]
    test_size: Option<f64>,

    /// Number of cross-validation folds [default: 5]
    #[arg(long)]
    folds: Option<usize>,

    /// Comma-separated C candidates [default: 0.1,1,10,100]
    #[arg(short = 'C', long, value_delimiter = ',')]
    c_values: Option<Vec<f64>>,

    /// Comma-separated gamma candidates [default: 0.001,0.01,0.1,1]
    #[arg(long, value_delimiter = ',')]
    gamma_values: Option<Vec<f64>>,

    /// Directory for the PNG plots [default: .]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip rendering the plots
    #[arg(long)]
    no_plots: bool,

    /// JSON experiment configuration; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full run report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(folds) = self.folds {
            config.folds = folds;
        }
        if let Some(c_values) = &self.c_values {
            config.c_values = c_values.clone();
        }
        if let Some(gamma_values) = &self.gamma_values {
            config.gamma_values = gamma_values.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.no_plots {
            config.plots = false;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Reading configuration from {:?}", path);
            ExperimentConfig::from_file(path)?
        }
        None => ExperimentConfig::default(),
    };
    cli.apply(&mut config);

    let mut report = experiment::run(&config)?;
    report.print_summary();

    let plotted = if config.plots {
        experiment::render_plots(&config, &report).map(|paths| report.plots = paths)
    } else {
        Ok(())
    };

    // The report is written even when plotting failed
    if let Some(path) = &cli.report {
        report.save_to_file(path)?;
        info!("Report saved to: {:?}", path);
    }

    plotted
}
