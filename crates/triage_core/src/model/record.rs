//! Content-store record adapter.
//!
//! # Responsibility
//! - Decode content records exported by the external store.
//! - Project them into `TriageItem` with canonical timestamps.
//!
//! # Invariants
//! - Unknown record fields are ignored.
//! - Malformed timestamps never fail a decode; they project to `None`.

use crate::model::item::TriageItem;
use crate::model::timestamp::{normalize_timestamp, RawTimestamp};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from snapshot decoding.
#[derive(Debug)]
pub enum RecordError {
    /// Snapshot is not valid JSON or not an array of records.
    Decode(serde_json::Error),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "invalid content snapshot: {err}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Generic content record as stored externally.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub triage_order: Option<f64>,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default)]
    pub updated_at: Option<RawTimestamp>,
}

impl ContentRecord {
    /// Projects the record into the board view.
    pub fn into_item(self) -> TriageItem {
        let mut item = TriageItem::from_tags(self.id, self.title, &self.tags);
        item.body = self.content;
        item.template_id = self.template_id.filter(|value| !value.trim().is_empty());
        item.owner_id = self.created_by;
        item.rank = self
            .triage_order
            .filter(|value| value.is_finite())
            .map(|value| value.trunc() as i64);
        item.created_at = normalize_timestamp(self.created_at.as_ref());
        item.updated_at = normalize_timestamp(self.updated_at.as_ref());
        item
    }
}

/// Decodes a JSON array of content records into board items.
pub fn items_from_snapshot_json(json: &str) -> Result<Vec<TriageItem>, RecordError> {
    let records: Vec<ContentRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(ContentRecord::into_item).collect())
}
