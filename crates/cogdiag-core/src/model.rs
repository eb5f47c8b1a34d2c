//! Core data model types for cogdiag.
//!
//! These are the fundamental types the entire system uses to represent
//! response records, the Q-matrix, and resolved interactions.

use serde::{Deserialize, Serialize};

use crate::index::IndexMaps;

/// One raw response record: a student answered an item correctly or not.
///
/// Source of truth for training; immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    /// Arbitrary student identifier.
    pub student_id: String,
    /// Arbitrary item identifier.
    pub item_id: String,
    /// Outcome: 1 for correct, 0 for incorrect.
    pub correct: u8,
}

/// Binary item-to-concept relevance matrix.
///
/// Row order fixes item indices; column order (excluding `item_id`) fixes
/// concept indices. Both are global and frozen for a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QMatrix {
    /// Item identifiers, one per row, in file order.
    pub item_ids: Vec<String>,
    /// Concept names, one per indicator column, in file order.
    pub concepts: Vec<String>,
    /// Indicator rows; `rows[i][c]` is 1.0 when item `i` exercises
    /// concept `c`, else 0.0.
    pub rows: Vec<Vec<f64>>,
}

impl QMatrix {
    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn n_concepts(&self) -> usize {
        self.concepts.len()
    }

    /// Indicator row for the item at `index`.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }
}

/// One resolved training sample: (student index, item index, outcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub student: usize,
    pub item: usize,
    pub correct: u8,
}

/// Resolve response rows into interactions, preserving source order.
///
/// Rows referencing an item absent from the Q-matrix are dropped without a
/// trace; training consumes the surviving sequence in this exact order every
/// epoch, so order is significant.
pub fn build_interactions(responses: &[ResponseRow], maps: &IndexMaps) -> Vec<Interaction> {
    responses
        .iter()
        .filter_map(|r| {
            let item = maps.item_index(&r.item_id)?;
            // Student ids always resolve when the maps were built from this
            // same response table.
            let student = maps.student_index(&r.student_id)?;
            Some(Interaction {
                student,
                item,
                correct: r.correct,
            })
        })
        .collect()
}
