//! Scalar metrics record emitter.

use std::path::Path;

use anyhow::{Context, Result};

use cogdiag_core::report::TrainingReport;

/// Write `metrics.json`: a flat record with keys `RMSE`, `AUC`, `Accuracy`,
/// `F1`, `Precision`, `Recall`. An undefined AUC serializes as `null`.
pub fn write_metrics_json(report: &TrainingReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&report.metrics)
        .context("failed to serialize metrics")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write metrics to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn metrics_json_carries_the_exact_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        write_metrics_json(&sample_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        for key in ["RMSE", "AUC", "Accuracy", "F1", "Precision", "Recall"] {
            assert!(value.get(key).is_some(), "missing key: {key}");
        }
        assert_eq!(value["Precision"], 1.0);
    }

    #[test]
    fn undefined_auc_is_null() {
        let mut report = sample_report();
        report.metrics.auc = f64::NAN;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        write_metrics_json(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["AUC"].is_null());
    }
}
