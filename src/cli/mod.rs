// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, loads the YAML config, applies any
// flag overrides and hands off to Layer 2. Printing to stdout
// happens here and nowhere else.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, ServeArgs};
use std::path::PathBuf;

use crate::infra::config::{AppConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(
    name = "score-predictor",
    version,
    about = "Train a linear regression exam-score model and serve predictions."
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Dataset CSV (overrides data_path)
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Model artifact path without extension (overrides model_path)
    #[arg(long, global = true)]
    pub model_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = self.load_config()?;
        match self.command {
            Commands::Train         => run_train(config),
            Commands::Evaluate      => run_evaluate(config),
            Commands::Predict(args) => run_predict(config, args),
            Commands::Serve(args)   => run_serve(config, args),
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(&self.config)?;
        if let Some(path) = &self.data_path {
            config.data_path = path.clone();
        }
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        Ok(config)
    }
}

fn run_train(config: AppConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training on '{}'", config.data_path.display());
    let report = TrainUseCase::new(config.clone()).execute()?;

    println!(
        "Saved {}-feature model ({} solver, intercept {:.3}) to {}",
        report.model.feature_names.len(),
        report.model.solver.as_str(),
        report.model.intercept,
        config.model_path.display()
    );
    for (name, coef) in report.model.coefficient_map() {
        println!("  {name:<20} {coef:>9.3}");
    }
    println!(
        "Trained on {} rows, tested on {} rows: MAE {:.3}, RMSE {:.3}, R^2 {:.3}",
        report.train_rows,
        report.test_rows,
        report.test_metrics.mae,
        report.test_metrics.rmse,
        report.test_metrics.r2,
    );
    Ok(())
}

fn run_evaluate(config: AppConfig) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let m = EvaluateUseCase::new(config).execute()?;
    println!("MAE:  {:.3}", m.mae);
    println!("RMSE: {:.3}", m.rmse);
    println!("R^2:  {:.3}", m.r2);
    Ok(())
}

fn run_predict(config: AppConfig, args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::from_model_path(&config.model_path)?;
    let score    = use_case.predict(args.hours, args.difficulty)?;
    println!("Predicted score: {score:.2}");
    Ok(())
}

fn run_serve(mut config: AppConfig, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::server::serve(&config))
}
