//! Pipeline orchestrator.
//!
//! Runs indexing, interaction building, training, and evaluation as one
//! synchronous, single-threaded pass and assembles the training report.

use anyhow::Result;
use uuid::Uuid;

use crate::evaluate::evaluate;
use crate::index::IndexMaps;
use crate::model::{build_interactions, QMatrix, ResponseRow};
use crate::params::ParameterStore;
use crate::report::{DatasetSummary, DifficultyTable, MasteryTable, RunSummary, TrainingReport};
use crate::train::{train, TrainConfig};

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    /// Number of training epochs.
    pub epochs: usize,
    /// Fixed learning rate.
    pub learning_rate: f64,
    /// Seed for the initial mastery draw; `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Clamp updated mastery entries into [0, 1].
    pub clamp_mastery: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 0.2,
            seed: None,
            clamp_mastery: false,
        }
    }
}

/// Run the full train-then-evaluate pipeline over already-parsed tables.
///
/// Response rows referencing items outside the Q-matrix are dropped without
/// an error, and an entirely-filtered dataset still completes: the loss
/// history is all zeros and the metrics take their neutral values.
pub fn run_pipeline(
    responses: &[ResponseRow],
    q_matrix: &QMatrix,
    config: &RunConfig,
) -> Result<TrainingReport> {
    anyhow::ensure!(config.epochs >= 1, "epochs must be at least 1");
    anyhow::ensure!(
        config.learning_rate > 0.0,
        "learning rate must be positive"
    );

    let maps = IndexMaps::build(responses, q_matrix);
    let interactions = build_interactions(responses, &maps);
    tracing::info!(
        students = maps.n_students(),
        items = maps.n_items(),
        concepts = q_matrix.n_concepts(),
        interactions = interactions.len(),
        "dataset resolved"
    );

    let mut store = ParameterStore::init(
        maps.n_students(),
        q_matrix.n_concepts(),
        maps.n_items(),
        config.seed,
    );

    let train_config = TrainConfig {
        epochs: config.epochs,
        learning_rate: config.learning_rate,
        clamp_mastery: config.clamp_mastery,
    };
    let loss_history = train(&mut store, q_matrix, &interactions, &train_config);
    tracing::info!(
        epochs = config.epochs,
        final_loss = loss_history.last().copied().unwrap_or(0.0),
        "training complete"
    );

    let metrics = evaluate(&store, q_matrix, &interactions);

    Ok(TrainingReport {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        dataset: DatasetSummary {
            students: maps.n_students(),
            items: maps.n_items(),
            concepts: q_matrix.n_concepts(),
            interactions: interactions.len(),
        },
        config: RunSummary {
            epochs: config.epochs,
            learning_rate: config.learning_rate,
            seed: config.seed,
            clamp_mastery: config.clamp_mastery,
        },
        loss_history,
        metrics,
        mastery: MasteryTable {
            student_ids: maps.students().to_vec(),
            concepts: q_matrix.concepts.clone(),
            values: store.mastery().to_vec(),
        },
        difficulty: DifficultyTable {
            item_ids: maps.items().to_vec(),
            values: store.difficulty().to_vec(),
        },
    })
}
