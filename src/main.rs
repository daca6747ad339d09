use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use faceroc::{config, run};
use log::info;

#[derive(Parser)]
#[command(name = "faceroc")]
#[command(
    version,
    about = "Evaluate a face-embedding model on same/different image pairs"
)]
struct Cli {
    /// Config file (defaults are used when it does not exist)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed every pair, compute ROC curves and recommend thresholds
    Evaluate {
        /// ONNX embedding model
        #[arg(short, long)]
        model: Option<PathBuf>,
        /// Directory holding the same/diff pair folders
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Where to write the ROC chart (SVG)
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Also write per-pair results and curves as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate {
            model,
            data,
            chart,
            output,
        } => {
            if let Some(model) = model {
                cfg.model_path = model;
            }
            if let Some(data) = data {
                cfg.data_dir = data;
            }
            if let Some(chart) = chart {
                cfg.chart_path = chart;
            }
            if output.is_some() {
                cfg.output_path = output;
            }
            evaluate(&cfg)
        }
        Commands::Config => {
            print!("{}", config::to_toml(&cfg)?);
            Ok(())
        }
    }
}

fn evaluate(cfg: &config::Config) -> Result<()> {
    let mut embedder = run::load_embedder(cfg)?;

    info!("Processing images from {}", cfg.data_dir.display());
    let report = run::evaluate_dataset(&mut embedder, cfg)?;

    println!();
    print!("{}", report.summary());

    run::write_outputs(cfg, &report)?;
    Ok(())
}
