//! Board configuration.
//!
//! # Responsibility
//! - Hold tunables shared by filtering, metrics and event history.
//! - Load and validate configuration from JSON.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - `week_utc_offset_minutes` stays within real-world UTC offsets.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Sentinel template id that matches unclassified items.
pub const DEFAULT_UNCLASSIFIED_TEMPLATE_ID: &str = "manual";
/// Default number of triage events returned by history queries.
pub const EVENT_HISTORY_DEFAULT_LIMIT: u32 = 50;
/// Upper bound for triage event history queries.
pub const EVENT_HISTORY_LIMIT_MAX: u32 = 200;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Errors from configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file cannot be read.
    Io(std::io::Error),
    /// Config text is not valid JSON for `BoardConfig`.
    Parse(serde_json::Error),
    /// A field holds an out-of-range value.
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read board config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse board config: {err}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid board config `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Triage board tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Template filter value that selects items with no classification.
    pub unclassified_template_id: String,
    /// UTC offset used to locate the Monday 00:00 week boundary.
    pub week_utc_offset_minutes: i32,
    /// Default triage event history size.
    pub event_history_limit: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            unclassified_template_id: DEFAULT_UNCLASSIFIED_TEMPLATE_ID.to_string(),
            week_utc_offset_minutes: 0,
            event_history_limit: EVENT_HISTORY_DEFAULT_LIMIT,
        }
    }
}

impl BoardConfig {
    /// Parses and validates config JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unclassified_template_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "unclassified_template_id",
                message: "must not be blank".to_string(),
            });
        }
        if self.week_utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "week_utc_offset_minutes",
                message: format!(
                    "{} is outside -{MAX_UTC_OFFSET_MINUTES}..={MAX_UTC_OFFSET_MINUTES}",
                    self.week_utc_offset_minutes
                ),
            });
        }
        Ok(())
    }
}

/// Normalizes an event history limit.
///
/// `None` and `0` fall back to the default; larger values clamp to the max.
pub fn normalize_event_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => EVENT_HISTORY_DEFAULT_LIMIT,
        Some(value) if value > EVENT_HISTORY_LIMIT_MAX => EVENT_HISTORY_LIMIT_MAX,
        Some(value) => value,
    }
}
