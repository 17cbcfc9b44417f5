//! Severity ordering for alerts, outbreaks, and anything else on the scale.
//!
//! All orderings here are stable: records with equal rank keep the order in
//! which they arrived. Inputs are borrowed and never reordered in place.

pub mod predictions;

pub use predictions::{prioritize_predictions, ProbabilityBand};

use crate::core::Ranked;
use std::cmp::Reverse;

/// Shared label table for both scales. `info` sits below `low`.
const LABEL_RANKS: &[(&str, u8)] = &[
    ("critical", 4),
    ("high", 3),
    ("medium", 2),
    ("low", 1),
    ("info", 0),
];

/// Rank of a free-form severity label, case-insensitive.
pub fn rank_label(label: &str) -> Option<u8> {
    let normalized = label.trim().to_lowercase();
    LABEL_RANKS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, rank)| *rank)
}

/// Most severe first, arrival order among ties.
pub fn prioritize<T: Ranked + Clone>(items: &[T]) -> Vec<T> {
    prioritize_by(items, |item| item.rank())
}

/// Stable descending sort on an arbitrary rank key.
pub fn prioritize_by<T, F>(items: &[T], rank: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> u8,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| Reverse(rank(item)));
    sorted
}

/// Order records that only expose a textual severity.
///
/// Unknown labels sort after every known label, in arrival order.
pub fn prioritize_by_label<T, F>(items: &[T], label: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| Reverse(rank_label(label(item))));
    sorted
}

/// True when `items` is already in non-increasing rank order.
pub fn is_prioritized<T: Ranked>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].rank() >= pair[1].rank())
}
