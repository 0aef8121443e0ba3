//! Board filter predicate.
//!
//! # Invariants
//! - All active predicates are AND-ed.
//! - `None`, blank, or `"all"` disables a predicate.
//! - Surviving items keep their input order.

use crate::config::BoardConfig;
use crate::model::item::TriageItem;
use serde::{Deserialize, Serialize};

/// Sentinel value that disables a filter predicate.
pub const FILTER_ALL: &str = "all";

/// User-selected board filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardFilters {
    pub template_id: Option<String>,
    pub owner_id: Option<String>,
    pub tag_query: Option<String>,
    pub text_query: Option<String>,
}

impl BoardFilters {
    /// Returns `true` when no predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.template_id).is_none()
            && active(&self.owner_id).is_none()
            && active(&self.tag_query).is_none()
            && active(&self.text_query).is_none()
    }
}

/// Selects items matching every active predicate.
pub fn filter_items(
    items: &[TriageItem],
    filters: &BoardFilters,
    config: &BoardConfig,
) -> Vec<TriageItem> {
    let template_id = active(&filters.template_id);
    let owner_id = active(&filters.owner_id);
    let tag_query = active(&filters.tag_query).map(str::to_lowercase);
    let text_query = active(&filters.text_query).map(str::to_lowercase);

    items
        .iter()
        .filter(|item| {
            template_id.map_or(true, |wanted| {
                matches_template(item, wanted, &config.unclassified_template_id)
            })
        })
        .filter(|item| owner_id.map_or(true, |wanted| item.owner_id == wanted))
        .filter(|item| {
            tag_query.as_deref().map_or(true, |query| {
                item.tags()
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(query))
            })
        })
        .filter(|item| {
            text_query.as_deref().map_or(true, |query| {
                format!("{} {}", item.title, item.body)
                    .to_lowercase()
                    .contains(query)
            })
        })
        .cloned()
        .collect()
}

fn matches_template(item: &TriageItem, wanted: &str, unclassified: &str) -> bool {
    match item.template_id.as_deref() {
        Some(template_id) => template_id == wanted,
        None => wanted == unclassified,
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != FILTER_ALL)
}
