//! Identifier indexing.
//!
//! Maps arbitrary student and item identifiers to dense zero-based indices.
//! Students are sorted ascending by string order; items keep Q-matrix row
//! order. Index assignment is deterministic given identical inputs.

use std::collections::HashMap;

use crate::model::{QMatrix, ResponseRow};

/// Immutable identifier-to-index maps shared by all downstream components.
#[derive(Debug, Clone)]
pub struct IndexMaps {
    students: Vec<String>,
    student_index: HashMap<String, usize>,
    items: Vec<String>,
    item_index: HashMap<String, usize>,
}

impl IndexMaps {
    /// Build index maps from the response table and the Q-matrix.
    pub fn build(responses: &[ResponseRow], q_matrix: &QMatrix) -> Self {
        let mut students: Vec<String> = responses.iter().map(|r| r.student_id.clone()).collect();
        students.sort();
        students.dedup();

        let student_index = students
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let items = q_matrix.item_ids.clone();
        let item_index = items
            .iter()
            .enumerate()
            .map(|(i, it)| (it.clone(), i))
            .collect();

        Self {
            students,
            student_index,
            items,
            item_index,
        }
    }

    /// Dense index for a student identifier, if known.
    pub fn student_index(&self, id: &str) -> Option<usize> {
        self.student_index.get(id).copied()
    }

    /// Dense index for an item identifier, if present in the Q-matrix.
    pub fn item_index(&self, id: &str) -> Option<usize> {
        self.item_index.get(id).copied()
    }

    /// Student identifiers in index order.
    pub fn students(&self) -> &[String] {
        &self.students
    }

    /// Item identifiers in index order (Q-matrix row order).
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn n_students(&self) -> usize {
        self.students.len()
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }
}
