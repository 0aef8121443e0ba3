//! Triage item domain model.
//!
//! # Responsibility
//! - Define the board view over an externally owned content record.
//! - Keep the column as an explicit enum and translate to legacy tags on demand.
//!
//! # Invariants
//! - `labels` never contains a column tag and never contains duplicates.
//! - `rank` is meaningful only within the item's current column.
//! - Timestamps are canonical epoch milliseconds; `None` means unavailable.

use crate::model::status::{
    apply_status, resolve_status, strip_column_tags, TriageStatus, TRIAGE_TAG,
};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the external content store.
pub type ItemId = String;

/// One item under triage board management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageItem {
    pub id: ItemId,
    pub title: String,
    pub body: String,
    /// Classification identifier. `None` means unclassified.
    pub template_id: Option<String>,
    /// Creating user. Used for filtering only.
    pub owner_id: String,
    /// Column the item currently lives in.
    pub status: TriageStatus,
    /// Non-column tags, in first-seen order.
    pub labels: Vec<String>,
    /// Intra-column position (`triage_order`). Ascending; `None` sorts last.
    pub rank: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl TriageItem {
    /// Creates a backlog item with no rank and no timestamps.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            template_id: None,
            owner_id: String::new(),
            status: TriageStatus::Backlog,
            labels: vec![TRIAGE_TAG.to_string()],
            rank: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Projects a legacy tag sequence into `status` + `labels`.
    pub fn from_tags<S: AsRef<str>>(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        tags: &[S],
    ) -> Self {
        let mut item = Self::new(id, title);
        item.set_tags(tags);
        item
    }

    /// Replaces status and labels from a legacy tag sequence.
    pub fn set_tags<S: AsRef<str>>(&mut self, tags: &[S]) {
        self.status = resolve_status(tags);
        self.labels = strip_column_tags(tags);
    }

    /// Legacy tag view: labels plus `"triage"` and the column tag.
    pub fn tags(&self) -> Vec<String> {
        apply_status(&self.labels, self.status)
    }

    /// Builder-style rank setter.
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Builder-style status setter.
    pub fn with_status(mut self, status: TriageStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style timestamp setter.
    pub fn with_timestamps(mut self, created_at: Option<i64>, updated_at: Option<i64>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}
