//! Post-training evaluation.
//!
//! Recomputes predicted probabilities for every interaction against the
//! final parameters and derives fit metrics. There is no held-out split: the
//! metrics measure training-set fit, not generalization.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Interaction, QMatrix};
use crate::params::ParameterStore;

/// The scalar fit metrics of one run.
///
/// Serialized under the exact key names the report artifacts use. AUC is NaN
/// when only one outcome class is present; NaN crosses JSON as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "AUC", with = "nan_as_null")]
    pub auc: f64,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
}

/// Serialize NaN as JSON null and read null back as NaN, so an undefined AUC
/// survives a save/load round trip as valid JSON.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(v)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Evaluate the final parameters over the training interactions.
pub fn evaluate(
    store: &ParameterStore,
    q_matrix: &QMatrix,
    interactions: &[Interaction],
) -> Metrics {
    let y_true: Vec<u8> = interactions.iter().map(|i| i.correct).collect();
    let y_prob: Vec<f64> = interactions
        .iter()
        .map(|i| store.predict(i.student, i.item, q_matrix.row(i.item)))
        .collect();
    let y_pred: Vec<u8> = y_prob.iter().map(|&p| u8::from(p >= 0.5)).collect();

    Metrics {
        rmse: rmse(&y_true, &y_prob),
        auc: roc_auc(&y_true, &y_prob),
        accuracy: accuracy(&y_true, &y_pred),
        f1: f1(&y_true, &y_pred),
        precision: precision(&y_true, &y_pred),
        recall: recall(&y_true, &y_pred),
    }
}

/// Root mean squared error between outcomes and probabilities.
pub fn rmse(y_true: &[u8], y_prob: &[f64]) -> f64 {
    let sum: f64 = y_true
        .iter()
        .zip(y_prob)
        .map(|(&y, &p)| (f64::from(y) - p).powi(2))
        .sum();
    (sum / y_true.len().max(1) as f64).sqrt()
}

/// Fraction of hard predictions matching the outcome; 0 over an empty set.
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len().max(1) as f64
}

fn confusion(y_true: &[u8], y_pred: &[u8]) -> (usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut fng = 0;
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t, p) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (1, 0) => fng += 1,
            _ => {}
        }
    }
    (tp, fp, fng)
}

/// Positive predictive value; 0 when nothing was predicted positive.
pub fn precision(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let (tp, fp, _) = confusion(y_true, y_pred);
    if tp + fp == 0 {
        0.0
    } else {
        tp as f64 / (tp + fp) as f64
    }
}

/// True positive rate; 0 when no positives exist.
pub fn recall(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let (tp, _, fng) = confusion(y_true, y_pred);
    if tp + fng == 0 {
        0.0
    } else {
        tp as f64 / (tp + fng) as f64
    }
}

/// Harmonic mean of precision and recall; 0 when both are 0.
pub fn f1(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let p = precision(y_true, y_pred);
    let r = recall(y_true, y_pred);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney) estimator, with
/// average ranks for tied probabilities.
///
/// Returns NaN when only one outcome class is present: AUC is undefined
/// there, and NaN is the sentinel rather than an error.
pub fn roc_auc(y_true: &[u8], y_prob: &[f64]) -> f64 {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return f64::NAN;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        y_prob[a]
            .partial_cmp(&y_prob[b])
            .unwrap_or(Ordering::Equal)
    });

    // Average ranks across tie groups, 1-based.
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && y_prob[order[j + 1]] == y_prob[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y == 1)
        .map(|(_, &r)| r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}
