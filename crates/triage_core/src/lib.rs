//! Core logic for the clinic triage board.
//! This crate is the single source of truth for board ordering, filtering,
//! metrics and drag-and-drop planning invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::events::{derive_triage_event, EventSource, TriageEventDraft};
pub use board::filter::{filter_items, BoardFilters, FILTER_ALL};
pub use board::metrics::{
    average_age, average_time_in_column, board_metrics, count_completed_in_week,
    count_completed_in_week_at_offset, lead_time_days, week_start_millis, BoardMetrics,
    ColumnMetrics,
};
pub use board::ordering::{compare_items, partition_into_buckets, sort_column, BoardBuckets};
pub use board::planner::{plan_drop, DropGesture, DropPlan, ItemUpdate};
pub use config::{BoardConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{ItemId, TriageItem};
pub use model::record::{items_from_snapshot_json, ContentRecord, RecordError};
pub use model::status::{apply_status, resolve_status, ParseStatusError, TriageStatus};
pub use model::timestamp::{normalize_timestamp, parse_timestamp_text, RawTimestamp};
pub use repo::event_repo::{SqliteTriageEventRepository, TriageEvent, TriageEventRepository};
pub use repo::item_repo::{SqliteTriageItemRepository, TriageItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::board_service::{BoardService, BoardServiceError, BoardView, MoveOutcome};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
