//! The `cogdiag train` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use cogdiag_core::engine::{run_pipeline, RunConfig};
use cogdiag_core::parser;
use cogdiag_core::report::TrainingReport;

fn fmt_metric(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else {
        format!("{v:.4}")
    }
}

fn print_summary(report: &TrainingReport) {
    println!(
        "Trained {} epochs over {} interactions ({} students, {} items, {} concepts)",
        report.config.epochs,
        report.dataset.interactions,
        report.dataset.students,
        report.dataset.items,
        report.dataset.concepts,
    );
    if let (Some(first), Some(last)) = (report.loss_history.first(), report.loss_history.last()) {
        println!("Loss: {:.4} -> {:.4}", first, last);
    }

    let m = &report.metrics;
    let mut table = Table::new();
    table.set_header(vec!["Metric".to_string(), "Value".to_string()]);
    table.add_row(vec!["RMSE".to_string(), fmt_metric(m.rmse)]);
    table.add_row(vec!["AUC".to_string(), fmt_metric(m.auc)]);
    table.add_row(vec!["Accuracy".to_string(), fmt_metric(m.accuracy)]);
    table.add_row(vec!["F1".to_string(), fmt_metric(m.f1)]);
    table.add_row(vec!["Precision".to_string(), fmt_metric(m.precision)]);
    table.add_row(vec!["Recall".to_string(), fmt_metric(m.recall)]);
    println!("{table}");
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    responses_path: PathBuf,
    q_matrix_path: PathBuf,
    output: PathBuf,
    epochs: usize,
    learning_rate: f64,
    seed: Option<u64>,
    clamp_mastery: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    // Validate inputs
    anyhow::ensure!(epochs >= 1, "epochs must be at least 1");
    anyhow::ensure!(learning_rate > 0.0, "learning rate must be positive");

    let responses = parser::parse_responses(&responses_path)?;
    let q_matrix = parser::parse_q_matrix(&q_matrix_path)?;
    tracing::debug!(
        responses = responses.len(),
        items = q_matrix.n_items(),
        concepts = q_matrix.n_concepts(),
        "input tables parsed"
    );

    let config = RunConfig {
        epochs,
        learning_rate,
        seed,
        clamp_mastery,
    };
    let report = run_pipeline(&responses, &q_matrix, &config)?;

    cogdiag_report::write_all(&report, &output)?;
    println!("Report artifacts written to {}", output.display());

    if let Some(json_path) = json {
        report.save_json(&json_path)?;
        println!("Full report saved to {}", json_path.display());
    }

    print_summary(&report);
    Ok(())
}
