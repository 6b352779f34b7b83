//! Retrieval metrics: Recall@K and the mean used to aggregate per-query scores.

use crate::eval::DocId;
use std::collections::HashSet;

/// Recall at K: proportion of the relevant documents that appear in the top-K retrieved.
/// Both sides are compared as sets, so duplicate ids never count twice. The denominator is
/// the length of `relevant` as given. If `relevant` is empty, returns 0.0.
pub fn recall_at_k(retrieved: &[DocId], relevant: &[DocId], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let relevant_set: HashSet<DocId> = relevant.iter().copied().collect();
    let top_k: HashSet<DocId> = retrieved.iter().take(k).copied().collect();
    let hits = relevant_set.intersection(&top_k).count();
    hits as f64 / relevant.len() as f64
}

/// Arithmetic mean. Returns None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
