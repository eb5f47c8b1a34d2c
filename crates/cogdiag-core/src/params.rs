//! Parameter store: the mastery matrix and the difficulty vector.
//!
//! The store exclusively owns both parameter blocks for the lifetime of one
//! training run. The training loop is the only writer; the evaluator and the
//! report emitter read the final state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The logistic function, mapping a real score to a probability.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Mutable mastery matrix S (students × concepts) and difficulty vector D
/// (items).
///
/// Mastery entries start as independent uniform draws from [0.4, 0.6);
/// difficulties start at zero. No bound is enforced during training: entries
/// may drift outside [0, 1] unless clamping was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStore {
    mastery: Vec<Vec<f64>>,
    difficulty: Vec<f64>,
}

impl ParameterStore {
    /// Initialize parameters for a run.
    ///
    /// `seed` makes the mastery draw reproducible; `None` draws from OS
    /// entropy, so two runs will start from different mastery matrices.
    pub fn init(n_students: usize, n_concepts: usize, n_items: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let mastery = (0..n_students)
            .map(|_| (0..n_concepts).map(|_| rng.gen_range(0.4..0.6)).collect())
            .collect();
        Self {
            mastery,
            difficulty: vec![0.0; n_items],
        }
    }

    /// Build a store from explicit parameter values.
    ///
    /// Used when the initial state must be fixed, e.g. to verify the update
    /// arithmetic step by step.
    pub fn from_parts(mastery: Vec<Vec<f64>>, difficulty: Vec<f64>) -> Self {
        Self {
            mastery,
            difficulty,
        }
    }

    /// Final mastery matrix, row per student.
    pub fn mastery(&self) -> &[Vec<f64>] {
        &self.mastery
    }

    /// Final difficulty vector, entry per item.
    pub fn difficulty(&self) -> &[f64] {
        &self.difficulty
    }

    /// Linear score for one (student, item) pair:
    /// dot(S[student], q_row) − D[item].
    pub fn raw_score(&self, student: usize, item: usize, q_row: &[f64]) -> f64 {
        let dot: f64 = self.mastery[student]
            .iter()
            .zip(q_row)
            .map(|(s, q)| s * q)
            .sum();
        dot - self.difficulty[item]
    }

    /// Predicted probability of a correct response.
    pub fn predict(&self, student: usize, item: usize, q_row: &[f64]) -> f64 {
        sigmoid(self.raw_score(student, item, q_row))
    }

    /// Apply one online gradient step for residual `g = p − y`.
    ///
    /// Mastery updates are gated by the indicator row: concepts the item does
    /// not exercise are untouched. The difficulty update pulls future
    /// predictions down when the response was better than expected.
    pub(crate) fn apply_update(
        &mut self,
        student: usize,
        item: usize,
        q_row: &[f64],
        g: f64,
        learning_rate: f64,
        clamp_mastery: bool,
    ) {
        for (entry, q) in self.mastery[student].iter_mut().zip(q_row) {
            *entry -= learning_rate * g * q;
            if clamp_mastery {
                *entry = entry.clamp(0.0, 1.0);
            }
        }
        self.difficulty[item] += learning_rate * g;
    }
}
