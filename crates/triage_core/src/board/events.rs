//! Triage transition events derived from drop plans.
//!
//! One event describes the moved item: where it came from, where it landed,
//! and its rank before and after.

use crate::board::ordering::BoardBuckets;
use crate::board::planner::{DropGesture, DropPlan};
use crate::model::item::ItemId;
use crate::model::status::TriageStatus;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How a transition was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Board drag-and-drop.
    Drag,
    /// Explicit status change outside the board gesture.
    Manual,
}

impl EventSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Manual => "manual",
        }
    }
}

impl Display for EventSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventSourceError(pub String);

impl Display for ParseEventSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported event source `{}`; expected drag|manual", self.0)
    }
}

impl Error for ParseEventSourceError {}

impl FromStr for EventSource {
    type Err = ParseEventSourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "drag" => Ok(Self::Drag),
            "manual" => Ok(Self::Manual),
            other => Err(ParseEventSourceError(other.to_string())),
        }
    }
}

/// Transition event before the store assigns id, author and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageEventDraft {
    pub item_id: ItemId,
    pub item_title: Option<String>,
    pub template_id: Option<String>,
    pub from_status: TriageStatus,
    pub to_status: TriageStatus,
    pub previous_order: Option<i64>,
    pub next_order: Option<i64>,
    pub source: EventSource,
    pub reason: Option<String>,
}

/// Builds the event for the moved item of an applied plan.
///
/// Returns `None` for an empty plan or when the plan does not touch the
/// moved item.
pub fn derive_triage_event(
    gesture: &DropGesture,
    buckets: &BoardBuckets,
    plan: &DropPlan,
    source: EventSource,
    reason: Option<String>,
) -> Option<TriageEventDraft> {
    let landed = plan.update_for(&gesture.moved_item_id)?;
    let moved = buckets
        .column(gesture.source)
        .iter()
        .find(|item| item.id == gesture.moved_item_id)?;

    Some(TriageEventDraft {
        item_id: moved.id.clone(),
        item_title: Some(moved.title.clone()).filter(|title| !title.is_empty()),
        template_id: moved.template_id.clone(),
        from_status: gesture.source,
        to_status: landed.status,
        previous_order: moved.rank,
        next_order: Some(landed.rank),
        source,
        reason: reason.filter(|value| !value.trim().is_empty()),
    })
}
