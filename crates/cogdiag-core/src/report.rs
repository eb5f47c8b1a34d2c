//! Training report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluate::Metrics;

/// The complete observable output of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Size of the dataset the run consumed.
    pub dataset: DatasetSummary,
    /// Configuration the run used.
    pub config: RunSummary,
    /// Per-epoch average loss, index 0 = epoch 1.
    pub loss_history: Vec<f64>,
    /// Training-set fit metrics.
    pub metrics: Metrics,
    /// Final mastery estimates.
    pub mastery: MasteryTable,
    /// Final difficulty estimates.
    pub difficulty: DifficultyTable,
}

/// Counts describing the resolved dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub students: usize,
    pub items: usize,
    pub concepts: usize,
    /// Interactions surviving the unknown-item filter.
    pub interactions: usize,
}

/// Echo of the run configuration, for provenance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: Option<u64>,
    pub clamp_mastery: bool,
}

/// Final mastery matrix with its row and column labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryTable {
    /// Student identifiers, one per row, in index order.
    pub student_ids: Vec<String>,
    /// Concept names, one per column, in Q-matrix column order.
    pub concepts: Vec<String>,
    /// Mastery values; `values[s][c]` belongs to student `s`, concept `c`.
    pub values: Vec<Vec<f64>>,
}

/// Final difficulty vector with its item labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyTable {
    /// Item identifiers in Q-matrix row order.
    pub item_ids: Vec<String>,
    /// Difficulty values, aligned with `item_ids`.
    pub values: Vec<f64>,
}

impl TrainingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: TrainingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
