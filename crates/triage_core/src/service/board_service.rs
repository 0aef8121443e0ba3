//! Triage board use-case service.
//!
//! # Responsibility
//! - Load the board: fetch, filter, bucket, sort and measure items.
//! - Persist drop plans and record the matching transition event.
//!
//! # Invariants
//! - A plan is persisted as one atomic batch or not at all.
//! - A failed batch is returned to the caller, which must reload the board
//!   before accepting another gesture; nothing is retried here.
//! - Event history is best effort: a failed event write never un-applies a move.

use crate::board::events::{derive_triage_event, EventSource};
use crate::board::filter::{filter_items, BoardFilters};
use crate::board::metrics::{board_metrics, BoardMetrics};
use crate::board::ordering::{partition_into_buckets, BoardBuckets};
use crate::board::planner::{plan_drop, DropGesture, DropPlan};
use crate::config::BoardConfig;
use crate::model::item::ItemId;
use crate::model::status::TriageStatus;
use crate::repo::event_repo::{TriageEvent, TriageEventRepository};
use crate::repo::item_repo::TriageItemRepository;
use crate::repo::RepoError;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from board service operations.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Target item does not exist in the store.
    ItemNotFound(ItemId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "triage item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ItemNotFound(_) => None,
        }
    }
}

impl From<RepoError> for BoardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Rendered board: sorted columns plus aggregate figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub buckets: BoardBuckets,
    pub metrics: BoardMetrics,
    /// Items in the store before filtering.
    pub total_items: usize,
}

/// Result of a persisted move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub plan: DropPlan,
    /// Recorded transition event, when history write succeeded.
    pub event: Option<TriageEvent>,
}

/// Board service facade over item and event repositories.
pub struct BoardService<R: TriageItemRepository, E: TriageEventRepository> {
    items: R,
    events: E,
    config: BoardConfig,
}

impl<R: TriageItemRepository, E: TriageEventRepository> BoardService<R, E> {
    /// Creates a service from repository implementations.
    pub fn new(items: R, events: E, config: BoardConfig) -> Self {
        Self {
            items,
            events,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Loads, filters and measures the board at `now_ms`.
    ///
    /// Metrics are computed over the filtered item set, matching what the
    /// columns show.
    pub fn load_board(
        &self,
        filters: &BoardFilters,
        now_ms: i64,
    ) -> Result<BoardView, BoardServiceError> {
        let all = self.items.list_items()?;
        let visible = filter_items(&all, filters, &self.config);
        let view = BoardView {
            buckets: partition_into_buckets(&visible),
            metrics: board_metrics(&visible, now_ms, &self.config),
            total_items: all.len(),
        };
        info!(
            "event=board_load module=service status=ok total={} visible={}",
            view.total_items,
            visible.len()
        );
        Ok(view)
    }

    /// Plans and persists a drag gesture against the buckets the UI showed.
    ///
    /// A stale gesture (item not in its source column) persists nothing and
    /// returns an empty plan.
    pub fn move_item(
        &self,
        gesture: &DropGesture,
        buckets: &BoardBuckets,
        changed_by: &str,
        now_ms: i64,
        reason: Option<String>,
    ) -> Result<MoveOutcome, BoardServiceError> {
        self.persist_gesture(gesture, buckets, changed_by, now_ms, EventSource::Drag, reason)
    }

    /// Moves one item to the end of `status` outside a drag gesture.
    pub fn set_status(
        &self,
        item_id: &str,
        status: TriageStatus,
        changed_by: &str,
        now_ms: i64,
        reason: Option<String>,
    ) -> Result<MoveOutcome, BoardServiceError> {
        let item = self
            .items
            .get_item(item_id)?
            .ok_or_else(|| BoardServiceError::ItemNotFound(item_id.to_string()))?;
        let buckets = partition_into_buckets(&self.items.list_items()?);
        let gesture = DropGesture {
            moved_item_id: item.id,
            source: item.status,
            destination: status,
            destination_index: i64::MAX,
        };
        self.persist_gesture(
            &gesture,
            &buckets,
            changed_by,
            now_ms,
            EventSource::Manual,
            reason,
        )
    }

    /// Recent transition events, newest first.
    pub fn history(&self, limit: Option<u32>) -> Result<Vec<TriageEvent>, BoardServiceError> {
        let limit = limit.or(Some(self.config.event_history_limit));
        Ok(self.events.list_events(limit)?)
    }

    fn persist_gesture(
        &self,
        gesture: &DropGesture,
        buckets: &BoardBuckets,
        changed_by: &str,
        now_ms: i64,
        source: EventSource,
        reason: Option<String>,
    ) -> Result<MoveOutcome, BoardServiceError> {
        let plan = plan_drop(gesture, buckets);
        if plan.is_noop() {
            info!(
                "event=board_move module=service status=noop source={}",
                source
            );
            return Ok(MoveOutcome { plan, event: None });
        }

        self.items.apply_updates(&plan.updates, changed_by, now_ms)?;

        let event = match derive_triage_event(gesture, buckets, &plan, source, reason) {
            Some(draft) => match self.events.record_events(&[draft], changed_by, now_ms) {
                Ok(mut stored) => stored.pop(),
                Err(err) => {
                    warn!(
                        "event=triage_event_record module=service status=error error={}",
                        err
                    );
                    None
                }
            },
            None => None,
        };

        info!(
            "event=board_move module=service status=ok source={} from={} to={} updates={}",
            source,
            gesture.source,
            gesture.destination,
            plan.updates.len()
        );
        Ok(MoveOutcome { plan, event })
    }
}
