//! CSV table parsers.
//!
//! Loads the response table and the Q-matrix, failing fast on missing
//! required columns before any training begins, and provides a non-fatal
//! validation pass over the loaded tables.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::DataError;
use crate::model::{QMatrix, ResponseRow};

/// Parse the response table from a CSV file.
///
/// Requires `student_id`, `item_id`, and `correct` header columns; extra
/// columns and arbitrary column order are accepted.
pub fn parse_responses(path: &Path) -> Result<Vec<ResponseRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open response table: {}", path.display()))?;
    parse_responses_reader(file)
        .with_context(|| format!("failed to parse response table: {}", path.display()))
}

/// Parse the response table from any reader (useful for testing).
pub fn parse_responses_reader<R: io::Read>(reader: R) -> Result<Vec<ResponseRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let col = |name: &str| -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                table: "response",
                column: name.to_string(),
            })
    };
    let student_col = col("student_id")?;
    let item_col = col("item_id")?;
    let correct_col = col("correct")?;

    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record.get(correct_col).unwrap_or("").trim();
        let correct = match raw.parse::<i64>() {
            Ok(0) => 0,
            Ok(1) => 1,
            _ => {
                return Err(DataError::InvalidOutcome {
                    row: row + 1,
                    value: raw.to_string(),
                }
                .into())
            }
        };
        rows.push(ResponseRow {
            student_id: record.get(student_col).unwrap_or("").to_string(),
            item_id: record.get(item_col).unwrap_or("").to_string(),
            correct,
        });
    }

    Ok(rows)
}

/// Parse the Q-matrix from a CSV file.
///
/// Requires an `item_id` column; every other column names a concept, and
/// column order fixes concept indices. Cells must be 0 or 1.
pub fn parse_q_matrix(path: &Path) -> Result<QMatrix> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open q-matrix: {}", path.display()))?;
    parse_q_matrix_reader(file)
        .with_context(|| format!("failed to parse q-matrix: {}", path.display()))
}

/// Parse the Q-matrix from any reader (useful for testing).
pub fn parse_q_matrix_reader<R: io::Read>(reader: R) -> Result<QMatrix> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let item_col = headers
        .iter()
        .position(|h| h == "item_id")
        .ok_or(DataError::MissingColumn {
            table: "q-matrix",
            column: "item_id".to_string(),
        })?;

    let concept_cols: Vec<usize> = (0..headers.len()).filter(|&i| i != item_col).collect();
    if concept_cols.is_empty() {
        return Err(DataError::NoConceptColumns.into());
    }
    let concepts: Vec<String> = concept_cols
        .iter()
        .map(|&i| headers[i].to_string())
        .collect();

    let mut item_ids = Vec::new();
    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        item_ids.push(record.get(item_col).unwrap_or("").to_string());

        let mut indicators = Vec::with_capacity(concept_cols.len());
        for (&col, concept) in concept_cols.iter().zip(&concepts) {
            let raw = record.get(col).unwrap_or("").trim();
            match raw.parse::<i64>() {
                Ok(0) => indicators.push(0.0),
                Ok(1) => indicators.push(1.0),
                _ => {
                    return Err(DataError::InvalidIndicator {
                        row: row + 1,
                        column: concept.clone(),
                        value: raw.to_string(),
                    }
                    .into())
                }
            }
        }
        rows.push(indicators);
    }

    Ok(QMatrix {
        item_ids,
        concepts,
        rows,
    })
}

/// A warning from table validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item ID this warning concerns (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate the loaded tables for issues that will not stop a run but are
/// probably not what the caller intended.
///
/// The training path itself stays silent about all of these; only the
/// `validate` surface reports them.
pub fn validate_tables(responses: &[ResponseRow], q_matrix: &QMatrix) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Response rows referencing items outside the Q-matrix get dropped
    // silently at interaction-build time.
    let known: std::collections::HashSet<&str> =
        q_matrix.item_ids.iter().map(|s| s.as_str()).collect();
    let unknown = responses
        .iter()
        .filter(|r| !known.contains(r.item_id.as_str()))
        .count();
    if unknown > 0 {
        warnings.push(ValidationWarning {
            item_id: None,
            message: format!(
                "{unknown} response row(s) reference items absent from the q-matrix and will be dropped"
            ),
        });
    }

    // Duplicate Q-matrix rows: the last occurrence wins in the index map.
    let mut seen = std::collections::HashSet::new();
    for id in &q_matrix.item_ids {
        if !seen.insert(id) {
            warnings.push(ValidationWarning {
                item_id: Some(id.clone()),
                message: format!("duplicate q-matrix row for item: {id}"),
            });
        }
    }

    // An all-zero indicator row makes the item's prediction depend on its
    // difficulty alone.
    for (id, row) in q_matrix.item_ids.iter().zip(&q_matrix.rows) {
        if row.iter().all(|&v| v == 0.0) {
            warnings.push(ValidationWarning {
                item_id: Some(id.clone()),
                message: format!("item {id} exercises no concepts (all-zero q-matrix row)"),
            });
        }
    }

    // AUC is undefined with a single outcome class.
    if !responses.is_empty() {
        let positives = responses.iter().filter(|r| r.correct == 1).count();
        if positives == 0 || positives == responses.len() {
            warnings.push(ValidationWarning {
                item_id: None,
                message: "all responses share one outcome class; AUC will be undefined".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSES: &str = "\
student_id,item_id,correct
s1,i1,1
s1,i2,0
s2,i1,0
";

    const Q_MATRIX: &str = "\
item_id,algebra,geometry
i1,1,0
i2,0,1
";

    #[test]
    fn parse_valid_responses() {
        let rows = parse_responses_reader(RESPONSES.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].student_id, "s1");
        assert_eq!(rows[0].item_id, "i1");
        assert_eq!(rows[0].correct, 1);
        assert_eq!(rows[2].correct, 0);
    }

    #[test]
    fn responses_accept_reordered_and_extra_columns() {
        let csv = "timestamp,correct,student_id,item_id\n2024-01-01,1,s1,i1\n";
        let rows = parse_responses_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].student_id, "s1");
        assert_eq!(rows[0].correct, 1);
    }

    #[test]
    fn responses_missing_column_fails_fast() {
        let csv = "student_id,item_id\ns1,i1\n";
        let err = parse_responses_reader(csv.as_bytes()).unwrap_err();
        let data_err = err.downcast_ref::<DataError>().unwrap();
        assert!(matches!(
            data_err,
            DataError::MissingColumn { table: "response", column } if column == "correct"
        ));
    }

    #[test]
    fn responses_reject_non_binary_outcome() {
        let csv = "student_id,item_id,correct\ns1,i1,2\n";
        let err = parse_responses_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>().unwrap(),
            DataError::InvalidOutcome { row: 1, .. }
        ));
    }

    #[test]
    fn parse_valid_q_matrix() {
        let q = parse_q_matrix_reader(Q_MATRIX.as_bytes()).unwrap();
        assert_eq!(q.item_ids, vec!["i1", "i2"]);
        assert_eq!(q.concepts, vec!["algebra", "geometry"]);
        assert_eq!(q.rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn q_matrix_item_id_column_may_sit_anywhere() {
        let csv = "algebra,item_id,geometry\n1,i1,0\n";
        let q = parse_q_matrix_reader(csv.as_bytes()).unwrap();
        assert_eq!(q.item_ids, vec!["i1"]);
        assert_eq!(q.concepts, vec!["algebra", "geometry"]);
        assert_eq!(q.rows, vec![vec![1.0, 0.0]]);
    }

    #[test]
    fn q_matrix_without_item_id_fails_fast() {
        let csv = "algebra,geometry\n1,0\n";
        let err = parse_q_matrix_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>().unwrap(),
            DataError::MissingColumn { table: "q-matrix", .. }
        ));
    }

    #[test]
    fn q_matrix_without_concepts_is_rejected() {
        let csv = "item_id\ni1\n";
        let err = parse_q_matrix_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>().unwrap(),
            DataError::NoConceptColumns
        ));
    }

    #[test]
    fn q_matrix_rejects_non_binary_indicator() {
        let csv = "item_id,algebra\ni1,0.5\n";
        let err = parse_q_matrix_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>().unwrap(),
            DataError::InvalidIndicator { row: 1, .. }
        ));
    }

    #[test]
    fn parse_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let r_path = dir.path().join("responses.csv");
        let q_path = dir.path().join("q.csv");
        std::fs::write(&r_path, RESPONSES).unwrap();
        std::fs::write(&q_path, Q_MATRIX).unwrap();

        assert_eq!(parse_responses(&r_path).unwrap().len(), 3);
        assert_eq!(parse_q_matrix(&q_path).unwrap().n_items(), 2);
    }

    #[test]
    fn validate_flags_unknown_items_and_single_class() {
        let responses = vec![
            ResponseRow {
                student_id: "s1".into(),
                item_id: "i1".into(),
                correct: 1,
            },
            ResponseRow {
                student_id: "s1".into(),
                item_id: "ghost".into(),
                correct: 1,
            },
        ];
        let q = parse_q_matrix_reader(Q_MATRIX.as_bytes()).unwrap();

        let warnings = validate_tables(&responses, &q);
        assert!(warnings.iter().any(|w| w.message.contains("dropped")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("AUC will be undefined")));
    }

    #[test]
    fn validate_flags_duplicate_and_all_zero_rows() {
        let csv = "item_id,algebra\ni1,1\ni1,0\ni2,0\n";
        let q = parse_q_matrix_reader(csv.as_bytes()).unwrap();

        let warnings = validate_tables(&[], &q);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("exercises no concepts")));
    }

    #[test]
    fn validate_clean_tables_is_quiet() {
        let responses = parse_responses_reader(RESPONSES.as_bytes()).unwrap();
        let q = parse_q_matrix_reader(Q_MATRIX.as_bytes()).unwrap();
        assert!(validate_tables(&responses, &q).is_empty());
    }
}
