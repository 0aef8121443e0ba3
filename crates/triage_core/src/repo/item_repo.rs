//! Triage item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store the item fields the board reads and writes.
//! - Apply drop-plan update batches atomically.
//!
//! # Invariants
//! - Tags are persisted as a JSON array in legacy form.
//! - `apply_updates` either writes every entry or none of them.
//! - Listing is deterministic: `id ASC`. Column order is the engine's job.

use crate::board::planner::ItemUpdate;
use crate::model::item::TriageItem;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    template_id,
    owner_id,
    tags,
    triage_order,
    created_at,
    updated_at
FROM triage_items";

/// Content-store contract used by the board service.
pub trait TriageItemRepository {
    /// Inserts or replaces one item (import/seed path).
    fn upsert_item(&self, item: &TriageItem) -> RepoResult<()>;
    /// Loads one item by id.
    fn get_item(&self, id: &str) -> RepoResult<Option<TriageItem>>;
    /// Loads the complete item collection.
    fn list_items(&self) -> RepoResult<Vec<TriageItem>>;
    /// Applies a drop-plan batch as one atomic write.
    fn apply_updates(&self, updates: &[ItemUpdate], changed_by: &str, now_ms: i64)
        -> RepoResult<()>;
}

/// SQLite-backed triage item repository.
pub struct SqliteTriageItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTriageItemRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TriageItemRepository for SqliteTriageItemRepository<'_> {
    fn upsert_item(&self, item: &TriageItem) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO triage_items (
                id,
                title,
                body,
                template_id,
                owner_id,
                tags,
                triage_order,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                template_id = excluded.template_id,
                owner_id = excluded.owner_id,
                tags = excluded.tags,
                triage_order = excluded.triage_order,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at;",
            params![
                item.id.as_str(),
                item.title.as_str(),
                item.body.as_str(),
                item.template_id.as_deref(),
                item.owner_id.as_str(),
                encode_tags(&item.tags())?,
                item.rank,
                item.created_at,
                item.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_item(&self, id: &str) -> RepoResult<Option<TriageItem>> {
        self.conn
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(read_item_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_items(&self) -> RepoResult<Vec<TriageItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(read_item_row(row)?);
        }
        Ok(items)
    }

    fn apply_updates(
        &self,
        updates: &[ItemUpdate],
        changed_by: &str,
        now_ms: i64,
    ) -> RepoResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for update in updates {
            let changed = tx.execute(
                "UPDATE triage_items
                 SET triage_order = ?2,
                     tags = ?3,
                     updated_by = ?4,
                     updated_at = ?5
                 WHERE id = ?1;",
                params![
                    update.id.as_str(),
                    update.rank,
                    encode_tags(&update.tags)?,
                    changed_by,
                    now_ms,
                ],
            )?;
            if changed == 0 {
                // Dropping `tx` rolls back every entry written so far.
                warn!(
                    "event=triage_apply module=repo status=error error_code=item_not_found batch_size={}",
                    updates.len()
                );
                return Err(RepoError::NotFound(update.id.clone()));
            }
        }
        tx.commit()?;

        info!(
            "event=triage_apply module=repo status=ok batch_size={}",
            updates.len()
        );
        Ok(())
    }
}

fn read_item_row(row: &Row<'_>) -> RepoResult<TriageItem> {
    let id: String = row.get("id")?;
    let tags_json: String = row.get("tags")?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|err| {
        RepoError::InvalidData(format!("invalid tags `{tags_json}` for item `{id}`: {err}"))
    })?;

    let mut item = TriageItem::from_tags(id, row.get::<_, String>("title")?, &tags);
    item.body = row.get("body")?;
    item.template_id = row.get("template_id")?;
    item.owner_id = row.get("owner_id")?;
    item.rank = row.get("triage_order")?;
    item.created_at = row.get("created_at")?;
    item.updated_at = row.get("updated_at")?;
    Ok(item)
}

fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode tags: {err}")))
}
