//! CSV table emitters.

use std::path::Path;

use anyhow::{Context, Result};

use cogdiag_core::report::TrainingReport;

/// Write the per-epoch loss table: `epoch` (1-based), `loss`.
pub fn write_loss_csv(report: &TrainingReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(["epoch", "loss"])?;
    for (i, loss) in report.loss_history.iter().enumerate() {
        wtr.write_record([(i + 1).to_string(), loss.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the mastery table: `student_id` plus one column per concept.
pub fn write_mastery_csv(report: &TrainingReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header = vec!["student_id".to_string()];
    header.extend(report.mastery.concepts.iter().cloned());
    wtr.write_record(&header)?;

    for (student, row) in report.mastery.student_ids.iter().zip(&report.mastery.values) {
        let mut record = vec![student.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the difficulty table: `item_id`, `difficulty`.
pub fn write_difficulty_csv(report: &TrainingReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(["item_id", "difficulty"])?;
    for (item, value) in report.difficulty.item_ids.iter().zip(&report.difficulty.values) {
        wtr.write_record([item.clone(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn loss_csv_is_one_based() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loss.csv");
        write_loss_csv(&sample_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("epoch,loss"));
        assert_eq!(lines.next(), Some("1,0.6931"));
        assert_eq!(lines.next(), Some("2,0.6812"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn mastery_csv_has_concept_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mastery.csv");
        write_mastery_csv(&sample_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("student_id,algebra,geometry"));
        assert_eq!(lines.next(), Some("s1,0.57,0.44"));
        assert_eq!(lines.next(), Some("s2,0.41,0.58"));
    }

    #[test]
    fn difficulty_csv_rows_align_with_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("difficulty.csv");
        write_difficulty_csv(&sample_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("item_id,difficulty"));
        assert_eq!(lines.next(), Some("i1,0.03"));
        assert_eq!(lines.next(), Some("i2,-0.07"));
    }
}
