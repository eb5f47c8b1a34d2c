//! cogdiag-report — flat tabular and JSON artifacts for a training run.
//!
//! Consumes the final `TrainingReport` from `cogdiag-core` and persists the
//! derived views: per-epoch loss, student mastery, item difficulty, and the
//! scalar metrics record.

use std::path::Path;

use anyhow::{Context, Result};

use cogdiag_core::report::TrainingReport;

pub mod metrics;
pub mod tables;

/// Write every report artifact into `dir`, creating it if needed.
///
/// Produces `training_metrics.csv`, `student_mastery.csv`,
/// `item_difficulty.csv`, and `metrics.json`.
pub fn write_all(report: &TrainingReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory: {}", dir.display()))?;

    tables::write_loss_csv(report, &dir.join("training_metrics.csv"))?;
    tables::write_mastery_csv(report, &dir.join("student_mastery.csv"))?;
    tables::write_difficulty_csv(report, &dir.join("item_difficulty.csv"))?;
    metrics::write_metrics_json(report, &dir.join("metrics.json"))?;

    tracing::info!(dir = %dir.display(), "report artifacts written");
    Ok(())
}
