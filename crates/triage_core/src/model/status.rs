//! Triage status enum and legacy tag codec.
//!
//! # Responsibility
//! - Define the explicit three-column status used by all board logic.
//! - Translate between the legacy tag encoding and `TriageStatus`.
//!
//! # Invariants
//! - `apply_status` output holds `"triage"` and exactly one column tag.
//! - Tags unrelated to triage status pass through untouched.
//! - Output tag order is first-occurrence order with duplicates removed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Marker tag carried by every item under board management.
pub const TRIAGE_TAG: &str = "triage";
/// Column tag for [`TriageStatus::Backlog`].
pub const BACKLOG_TAG: &str = "triage-backlog";
/// Column tag for [`TriageStatus::InProgress`].
pub const IN_PROGRESS_TAG: &str = "triage-in-progress";
/// Column tag for [`TriageStatus::Done`].
pub const DONE_TAG: &str = "triage-done";

const COLUMN_TAGS: [&str; 3] = [BACKLOG_TAG, IN_PROGRESS_TAG, DONE_TAG];

/// Board column an item lives in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TriageStatus {
    /// Not started. Default column for new or untagged items.
    #[default]
    Backlog,
    /// Being worked on.
    InProgress,
    /// Completed.
    Done,
}

impl TriageStatus {
    /// Columns in board display order.
    pub const ALL: [TriageStatus; 3] = [Self::Backlog, Self::InProgress, Self::Done];

    /// Stable wire value (`backlog|in-progress|done`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Legacy column tag encoding this status.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Backlog => BACKLOG_TAG,
            Self::InProgress => IN_PROGRESS_TAG,
            Self::Done => DONE_TAG,
        }
    }
}

impl Display for TriageStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported triage status `{}`; expected backlog|in-progress|done",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for TriageStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "backlog" => Ok(Self::Backlog),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Resolves the column encoded by a tag set.
///
/// `done` wins over `in-progress`, which wins over the `backlog` default.
pub fn resolve_status<S: AsRef<str>>(tags: &[S]) -> TriageStatus {
    let has = |needle: &str| tags.iter().any(|tag| tag.as_ref() == needle);
    if has(DONE_TAG) {
        TriageStatus::Done
    } else if has(IN_PROGRESS_TAG) {
        TriageStatus::InProgress
    } else {
        TriageStatus::Backlog
    }
}

/// Re-stamps a tag set with `status`.
///
/// Removes every column tag, keeps `"triage"` (adding it when absent), then
/// appends the tag for `status`.
pub fn apply_status<S: AsRef<str>>(tags: &[S], status: TriageStatus) -> Vec<String> {
    let mut out = strip_column_tags(tags);
    if !out.iter().any(|tag| tag == TRIAGE_TAG) {
        out.push(TRIAGE_TAG.to_string());
    }
    out.push(status.tag().to_string());
    out
}

/// Returns `true` when `tag` is one of the three column tags.
pub fn is_column_tag(tag: &str) -> bool {
    COLUMN_TAGS.contains(&tag)
}

/// Drops column tags and duplicates, keeping first-occurrence order.
pub fn strip_column_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| !is_column_tag(tag))
        .filter(|tag| seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_backlog() {
        assert_eq!(TriageStatus::default(), TriageStatus::Backlog);
    }

    #[test]
    fn resolve_prefers_done_over_in_progress() {
        let tags = ["triage", IN_PROGRESS_TAG, DONE_TAG];
        assert_eq!(resolve_status(&tags), TriageStatus::Done);
    }

    #[test]
    fn resolve_defaults_to_backlog() {
        assert_eq!(resolve_status(&["triage"]), TriageStatus::Backlog);
        assert_eq!(resolve_status::<&str>(&[]), TriageStatus::Backlog);
    }

    #[test]
    fn apply_replaces_column_tag_and_dedups() {
        let tags = ["anamnese", "triage", BACKLOG_TAG, "anamnese", DONE_TAG];
        let out = apply_status(&tags, TriageStatus::InProgress);
        assert_eq!(out, vec!["anamnese", "triage", IN_PROGRESS_TAG]);
    }

    #[test]
    fn apply_adds_missing_triage_marker() {
        let out = apply_status(&["exam"], TriageStatus::Done);
        assert_eq!(out, vec!["exam", "triage", DONE_TAG]);
    }

    #[test]
    fn parse_accepts_both_spellings() {
        assert_eq!(
            "In_Progress".parse::<TriageStatus>().expect("parse"),
            TriageStatus::InProgress
        );
        assert!("blocked".parse::<TriageStatus>().is_err());
    }
}
