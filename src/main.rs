use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use rustcast::application::ml::model::ModelKind;
use rustcast::application::pipeline::{backtest_series, predict_series, train_series};
use rustcast::config::Config;
use rustcast::domain::market::price_series::PriceSeries;
use rustcast::infrastructure::persistence::model_store::ModelStore;
use rustcast::infrastructure::price_csv::load_price_series;
use rustcast::infrastructure::synthetic_prices::{DEFAULT_SYNTHETIC_BARS, synthetic_series};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

/// Next-day return forecasting and walk-forward backtests
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file. Environment variables are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a synthetic uptrend when a price file cannot be read
    #[arg(long, global = true)]
    synthetic_fallback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the next-period return for the latest bar
    Predict {
        /// Price CSV (timestamp,open,high,low,close[,volume])
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Model file (overrides MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Walk-forward backtest of one or more price files
    Backtest {
        /// Price CSV files, evaluated independently
        #[arg(long, num_args = 1..)]
        prices: Vec<PathBuf>,

        /// Number of folds (overrides BACKTEST_SPLITS)
        #[arg(long)]
        splits: Option<usize>,
    },
    /// Fit a model on a price file and save it
    Train {
        #[arg(long)]
        prices: Option<PathBuf>,

        /// ridge, forest or mean
        #[arg(long, default_value = "ridge")]
        kind: String,

        /// Output model file (overrides MODEL_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only JSON results.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Predict { prices, model } => {
            let series = load_or_synthesize(prices.as_deref(), cli.synthetic_fallback)?;
            let path = model.unwrap_or_else(|| config.model.model_path.clone());
            let store = ModelStore::new(path);
            let model = store
                .load_or_train(&config.model)
                .with_context(|| format!("Failed to obtain model at {:?}", store.path()))?;
            let forecast = predict_series(&series, &config, &model)?;
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
        Commands::Backtest { prices, splits } => {
            if let Some(splits) = splits {
                config.backtest.splits = splits;
            }
            let inputs: Vec<Option<PathBuf>> = if prices.is_empty() {
                vec![None]
            } else {
                prices.into_iter().map(Some).collect()
            };
            info!("Running {} backtest(s)", inputs.len());

            let results: Vec<serde_json::Value> = inputs
                .par_iter()
                .map(|path| {
                    let label = path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "synthetic".to_string());
                    match load_or_synthesize(path.as_deref(), cli.synthetic_fallback) {
                        Ok(series) => json!({
                            "source": label,
                            "result": backtest_series(&series, &config),
                        }),
                        Err(e) => json!({ "source": label, "error": format!("{:#}", e) }),
                    }
                })
                .collect();

            let output = if results.len() == 1 {
                results.into_iter().next().unwrap_or_default()
            } else {
                serde_json::Value::Array(results)
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Train {
            prices,
            kind,
            output,
        } => {
            let kind: ModelKind = kind.parse()?;
            let series = load_or_synthesize(prices.as_deref(), cli.synthetic_fallback)?;
            let path = output.unwrap_or_else(|| config.model.model_path.clone());
            let store = ModelStore::new(path);
            let model = train_series(&series, &config, kind, &store)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "kind": model.kind(),
                    "path": store.path(),
                    "feature_names": model.feature_names,
                }))?
            );
        }
    }

    Ok(())
}

/// Reads `path`, or builds the synthetic series when no path is given, or when
/// `fallback` is set and the read fails or yields no bars.
fn load_or_synthesize(path: Option<&Path>, fallback: bool) -> Result<PriceSeries> {
    let Some(path) = path else {
        info!("No price file given; using synthetic prices");
        return synthetic_series(DEFAULT_SYNTHETIC_BARS);
    };
    match load_price_series(path) {
        Ok(series) if series.is_empty() && fallback => {
            warn!("{:?} has no usable bars; falling back to synthetic prices", path);
            synthetic_series(DEFAULT_SYNTHETIC_BARS)
        }
        Ok(series) => Ok(series),
        Err(e) if fallback => {
            warn!("{:#}; falling back to synthetic prices", e);
            synthetic_series(DEFAULT_SYNTHETIC_BARS)
        }
        Err(e) => Err(e),
    }
}
