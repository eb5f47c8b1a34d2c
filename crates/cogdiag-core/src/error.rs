//! Input error types.
//!
//! These errors represent malformed input tables. Defined in `cogdiag-core`
//! so callers can classify failures without string matching; everything the
//! core raises before training begins is one of these.

use thiserror::Error;

/// Errors raised while loading the response table or the Q-matrix.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required header column is absent.
    #[error("missing required column '{column}' in {table} table")]
    MissingColumn { table: &'static str, column: String },

    /// The `correct` column holds something other than 0 or 1.
    #[error("invalid outcome '{value}' at response row {row}: must be 0 or 1")]
    InvalidOutcome { row: usize, value: String },

    /// A Q-matrix indicator cell holds something other than 0 or 1.
    #[error("invalid indicator '{value}' in column '{column}' at q-matrix row {row}: must be 0 or 1")]
    InvalidIndicator {
        row: usize,
        column: String,
        value: String,
    },

    /// The Q-matrix carries only the `item_id` column.
    #[error("q-matrix has no concept columns")]
    NoConceptColumns,
}
