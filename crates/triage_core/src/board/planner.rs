//! Drag-and-drop planning.
//!
//! # Responsibility
//! - Turn one drop gesture into the rank/tag updates that realize it.
//!
//! # Invariants
//! - Pure: buckets are read, never mutated, and nothing is persisted here.
//! - Every column touched by a plan is re-ranked densely from 1.
//! - Only items present in the instructed columns receive updates.
//! - A moved item missing from its source column yields an empty plan.

use crate::board::ordering::BoardBuckets;
use crate::model::item::{ItemId, TriageItem};
use crate::model::status::{apply_status, TriageStatus};
use log::debug;
use serde::{Deserialize, Serialize};

/// One drag-and-drop gesture as reported by the board UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropGesture {
    pub moved_item_id: ItemId,
    pub source: TriageStatus,
    pub destination: TriageStatus,
    /// Target index in the destination column. Out-of-range values are clamped.
    pub destination_index: i64,
}

/// Persistence update for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub rank: i64,
    pub status: TriageStatus,
    /// Legacy tag view carrying the column tag for `status`.
    pub tags: Vec<String>,
}

/// Updates computed from one gesture. Empty means nothing to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPlan {
    pub updates: Vec<ItemUpdate>,
}

impl DropPlan {
    /// Returns `true` when the plan carries no updates.
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }

    /// Update for one item, if the plan touches it.
    pub fn update_for(&self, id: &str) -> Option<&ItemUpdate> {
        self.updates.iter().find(|update| update.id == id)
    }

    /// Updates that land in `status`, in column order.
    pub fn column(&self, status: TriageStatus) -> Vec<&ItemUpdate> {
        self.updates
            .iter()
            .filter(|update| update.status == status)
            .collect()
    }
}

/// Computes the updates needed to realize `gesture` against `buckets`.
pub fn plan_drop(gesture: &DropGesture, buckets: &BoardBuckets) -> DropPlan {
    let source = buckets.column(gesture.source);
    let Some(from_index) = source
        .iter()
        .position(|item| item.id == gesture.moved_item_id)
    else {
        debug!(
            "event=drop_plan module=board status=noop reason=item_not_in_source source={}",
            gesture.source
        );
        return DropPlan::default();
    };

    let mut source_list: Vec<&TriageItem> = source.iter().collect();
    let moved = source_list.remove(from_index);

    let updates = if gesture.source == gesture.destination {
        let index = clamp_index(gesture.destination_index, source_list.len());
        source_list.insert(index, moved);
        rank_column(&source_list, gesture.source)
    } else {
        let mut destination_list: Vec<&TriageItem> = buckets
            .column(gesture.destination)
            .iter()
            .filter(|item| item.id != gesture.moved_item_id)
            .collect();
        let index = clamp_index(gesture.destination_index, destination_list.len());
        destination_list.insert(index, moved);

        let mut updates = rank_column(&source_list, gesture.source);
        updates.extend(rank_column(&destination_list, gesture.destination));
        updates
    };

    debug!(
        "event=drop_plan module=board status=ok source={} destination={} updates={}",
        gesture.source,
        gesture.destination,
        updates.len()
    );
    DropPlan { updates }
}

fn rank_column(items: &[&TriageItem], status: TriageStatus) -> Vec<ItemUpdate> {
    items
        .iter()
        .zip(1_i64..)
        .map(|(item, rank)| ItemUpdate {
            id: item.id.clone(),
            rank,
            status,
            tags: apply_status(&item.labels, status),
        })
        .collect()
}

fn clamp_index(index: i64, max: usize) -> usize {
    usize::try_from(index.max(0)).map_or(max, |value| value.min(max))
}

#[cfg(test)]
mod tests {
    use super::clamp_index;

    #[test]
    fn clamp_index_bounds() {
        assert_eq!(clamp_index(-4, 3), 0);
        assert_eq!(clamp_index(2, 3), 2);
        assert_eq!(clamp_index(99, 3), 3);
        assert_eq!(clamp_index(0, 0), 0);
    }
}
