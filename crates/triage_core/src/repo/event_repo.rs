//! Triage event history repository.
//!
//! # Invariants
//! - One `record_events` call writes all drafts or none.
//! - History is returned newest first: `created_at DESC, id ASC`.

use crate::board::events::{EventSource, TriageEventDraft};
use crate::config::normalize_event_limit;
use crate::model::status::TriageStatus;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored triage transition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageEvent {
    pub id: Uuid,
    #[serde(flatten)]
    pub draft: TriageEventDraft,
    pub changed_by: String,
    pub created_at: i64,
}

/// Event history contract.
pub trait TriageEventRepository {
    /// Stores drafts, stamping id, author and creation time.
    fn record_events(
        &self,
        drafts: &[TriageEventDraft],
        changed_by: &str,
        now_ms: i64,
    ) -> RepoResult<Vec<TriageEvent>>;
    /// Lists recent events, newest first.
    fn list_events(&self, limit: Option<u32>) -> RepoResult<Vec<TriageEvent>>;
}

/// SQLite-backed event history.
pub struct SqliteTriageEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTriageEventRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TriageEventRepository for SqliteTriageEventRepository<'_> {
    fn record_events(
        &self,
        drafts: &[TriageEventDraft],
        changed_by: &str,
        now_ms: i64,
    ) -> RepoResult<Vec<TriageEvent>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut stored = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let event = TriageEvent {
                id: Uuid::new_v4(),
                draft: draft.clone(),
                changed_by: changed_by.to_string(),
                created_at: now_ms,
            };
            tx.execute(
                "INSERT INTO triage_events (
                    id,
                    item_id,
                    item_title,
                    template_id,
                    from_status,
                    to_status,
                    previous_order,
                    next_order,
                    changed_by,
                    source,
                    reason,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
                params![
                    event.id.to_string(),
                    draft.item_id.as_str(),
                    draft.item_title.as_deref(),
                    draft.template_id.as_deref(),
                    draft.from_status.as_str(),
                    draft.to_status.as_str(),
                    draft.previous_order,
                    draft.next_order,
                    changed_by,
                    draft.source.as_str(),
                    draft.reason.as_deref(),
                    now_ms,
                ],
            )?;
            stored.push(event);
        }
        tx.commit()?;
        Ok(stored)
    }

    fn list_events(&self, limit: Option<u32>) -> RepoResult<Vec<TriageEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                item_id,
                item_title,
                template_id,
                from_status,
                to_status,
                previous_order,
                next_order,
                changed_by,
                source,
                reason,
                created_at
             FROM triage_events
             ORDER BY created_at DESC, id ASC
             LIMIT ?1;",
        )?;
        let mut rows = stmt.query([i64::from(normalize_event_limit(limit))])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(read_event_row(row)?);
        }
        Ok(events)
    }
}

fn read_event_row(row: &Row<'_>) -> RepoResult<TriageEvent> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in triage_events.id"))
    })?;

    Ok(TriageEvent {
        id,
        draft: TriageEventDraft {
            item_id: row.get("item_id")?,
            item_title: row.get("item_title")?,
            template_id: row.get("template_id")?,
            from_status: parse_status_column(row, "from_status")?,
            to_status: parse_status_column(row, "to_status")?,
            previous_order: row.get("previous_order")?,
            next_order: row.get("next_order")?,
            source: {
                let value: String = row.get("source")?;
                value.parse::<EventSource>().map_err(|err| {
                    RepoError::InvalidData(format!("{err} in triage_events.source"))
                })?
            },
            reason: row.get("reason")?,
        },
        changed_by: row.get("changed_by")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_status_column(row: &Row<'_>, column: &'static str) -> RepoResult<TriageStatus> {
    let value: String = row.get(column)?;
    value
        .parse::<TriageStatus>()
        .map_err(|err| RepoError::InvalidData(format!("{err} in triage_events.{column}")))
}
