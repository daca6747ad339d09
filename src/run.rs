//! Sequencing of a full evaluation run.

use anyhow::{Context, Result};
use faceroc_vision::{Embedder, OnnxEmbedder};
use log::info;

use crate::config::Config;
use crate::error::SetupError;
use crate::evaluate::evaluate;
use crate::pairs::load_pairs;
use crate::report::{self, RunReport};
use crate::roc::analyze_samples;

/// Check the model artifact exists and load it.
pub fn load_embedder(cfg: &Config) -> Result<OnnxEmbedder> {
    if !cfg.model_path.is_file() {
        return Err(SetupError::ModelNotFound(cfg.model_path.clone()).into());
    }
    OnnxEmbedder::load(&cfg.model_path, &cfg.input_spec()).context("failed to load model")
}

/// Enumerate pairs, embed them, and analyze both metrics.
///
/// Missing input directories fail before any image is touched.
pub fn evaluate_dataset<E: Embedder + ?Sized>(embedder: &mut E, cfg: &Config) -> Result<RunReport> {
    let pairs = load_pairs(&cfg.data_dir, &cfg.same_dir, &cfg.diff_dir)?;
    let samples = evaluate(embedder, &pairs, &cfg.input_spec(), cfg.placeholder_size())?;
    let analyses = analyze_samples(&samples).context("analyzing distances")?;
    Ok(RunReport { samples, analyses })
}

/// Write the chart and, if configured, the JSON results.
pub fn write_outputs(cfg: &Config, report: &RunReport) -> Result<()> {
    report::write_chart(&cfg.chart_path, &report.analyses)?;
    info!("ROC chart written to {}", cfg.chart_path.display());

    if let Some(path) = &cfg.output_path {
        report::write_json(path, report)?;
        info!("Results written to {}", path.display());
    }
    Ok(())
}
