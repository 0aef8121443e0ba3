//! Intra-column ordering and column bucketing.
//!
//! # Invariants
//! - Order is rank ascending, unranked last, ties by `updated_at` descending.
//! - Comparison depends only on the two items' fields.

use crate::model::item::TriageItem;
use crate::model::status::TriageStatus;
use crate::model::timestamp::millis_or_zero;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Total order over items within one column.
pub fn compare_items(a: &TriageItem, b: &TriageItem) -> Ordering {
    let rank_a = a.rank.unwrap_or(i64::MAX);
    let rank_b = b.rank.unwrap_or(i64::MAX);
    rank_a.cmp(&rank_b).then_with(|| {
        millis_or_zero(b.updated_at).cmp(&millis_or_zero(a.updated_at))
    })
}

/// Sorts one column in place (stable).
pub fn sort_column(items: &mut [TriageItem]) {
    items.sort_by(compare_items);
}

/// Items grouped per column, each column already sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardBuckets {
    pub backlog: Vec<TriageItem>,
    pub in_progress: Vec<TriageItem>,
    pub done: Vec<TriageItem>,
}

impl BoardBuckets {
    /// Items of one column.
    pub fn column(&self, status: TriageStatus) -> &[TriageItem] {
        match status {
            TriageStatus::Backlog => &self.backlog,
            TriageStatus::InProgress => &self.in_progress,
            TriageStatus::Done => &self.done,
        }
    }

    /// Mutable items of one column.
    pub fn column_mut(&mut self, status: TriageStatus) -> &mut Vec<TriageItem> {
        match status {
            TriageStatus::Backlog => &mut self.backlog,
            TriageStatus::InProgress => &mut self.in_progress,
            TriageStatus::Done => &mut self.done,
        }
    }

    /// Total number of items on the board.
    pub fn len(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when no column holds an item.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups items by resolved status and sorts every column.
pub fn partition_into_buckets(items: &[TriageItem]) -> BoardBuckets {
    let mut buckets = BoardBuckets::default();
    for item in items {
        buckets.column_mut(item.status).push(item.clone());
    }
    for status in TriageStatus::ALL {
        sort_column(buckets.column_mut(status));
    }
    buckets
}
