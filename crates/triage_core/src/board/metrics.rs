//! Time-windowed board metrics.
//!
//! # Responsibility
//! - Derive age, time-in-column, weekly throughput and lead time figures.
//!
//! # Invariants
//! - Every function takes the reference instant explicitly.
//! - Averages are `>= 0`, rounded to one decimal, and `0.0` on empty input.
//!
//! Time in column is approximated with `updated_at`: there is no per-transition
//! timestamp, so any edit to an item restarts its apparent time in column.

use crate::config::BoardConfig;
use crate::model::item::TriageItem;
use crate::model::status::TriageStatus;
use crate::model::timestamp::{millis_or_zero, millis_to_days, round_one_decimal};
use chrono::{DateTime, Datelike, Days, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// Average age in days of items currently in `status`.
///
/// Age is measured from `created_at`, falling back to `updated_at`.
pub fn average_age(items: &[TriageItem], status: TriageStatus, now_ms: i64) -> f64 {
    average_elapsed_days(items, status, now_ms, |item| {
        item.created_at.or(item.updated_at)
    })
}

/// Average days since last modification of items currently in `status`.
///
/// Uses `updated_at` (falling back to `created_at`) as a proxy for the last
/// status change.
pub fn average_time_in_column(items: &[TriageItem], status: TriageStatus, now_ms: i64) -> f64 {
    average_elapsed_days(items, status, now_ms, |item| {
        item.updated_at.or(item.created_at)
    })
}

/// Counts done items updated since the most recent Monday 00:00 UTC.
pub fn count_completed_in_week(items: &[TriageItem], now_ms: i64) -> usize {
    count_completed_in_week_at_offset(items, now_ms, 0)
}

/// Counts done items updated since the most recent Monday 00:00 in the given
/// fixed UTC offset.
pub fn count_completed_in_week_at_offset(
    items: &[TriageItem],
    now_ms: i64,
    utc_offset_minutes: i32,
) -> usize {
    let Some(week_start) = week_start_millis(now_ms, utc_offset_minutes) else {
        return 0;
    };
    items
        .iter()
        .filter(|item| item.status == TriageStatus::Done)
        .filter(|item| millis_or_zero(item.updated_at) >= week_start)
        .count()
}

/// Average creation-to-completion time in days over done items.
///
/// Items with a missing timestamp, or whose `updated_at` precedes
/// `created_at`, are left out of the average.
pub fn lead_time_days(items: &[TriageItem]) -> f64 {
    let spans: Vec<i64> = items
        .iter()
        .filter(|item| item.status == TriageStatus::Done)
        .filter_map(|item| {
            let created = item.created_at?;
            let updated = item.updated_at?;
            (updated >= created).then(|| updated - created)
        })
        .collect();
    average_days(&spans)
}

/// Epoch millis of the Monday 00:00 that opens the week containing `now_ms`.
pub fn week_start_millis(now_ms: i64, utc_offset_minutes: i32) -> Option<i64> {
    let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
    let local = DateTime::from_timestamp_millis(now_ms)?.with_timezone(&offset);
    let days_since_monday = u64::from(local.weekday().num_days_from_monday());
    let monday = local
        .date_naive()
        .checked_sub_days(Days::new(days_since_monday))?
        .and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&monday)
        .single()
        .map(|start| start.timestamp_millis())
}

/// Per-column figures shown in a column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetrics {
    pub status: TriageStatus,
    pub count: usize,
    pub average_age_days: f64,
    pub average_time_in_column_days: f64,
}

/// Aggregate board figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub columns: Vec<ColumnMetrics>,
    pub completed_this_week: usize,
    pub lead_time_days: f64,
}

/// Computes all board figures for one snapshot.
pub fn board_metrics(items: &[TriageItem], now_ms: i64, config: &BoardConfig) -> BoardMetrics {
    let columns = TriageStatus::ALL
        .into_iter()
        .map(|status| ColumnMetrics {
            status,
            count: items.iter().filter(|item| item.status == status).count(),
            average_age_days: average_age(items, status, now_ms),
            average_time_in_column_days: average_time_in_column(items, status, now_ms),
        })
        .collect();

    BoardMetrics {
        columns,
        completed_this_week: count_completed_in_week_at_offset(
            items,
            now_ms,
            config.week_utc_offset_minutes,
        ),
        lead_time_days: lead_time_days(items),
    }
}

fn average_elapsed_days<F>(items: &[TriageItem], status: TriageStatus, now_ms: i64, since: F) -> f64
where
    F: Fn(&TriageItem) -> Option<i64>,
{
    let spans: Vec<i64> = items
        .iter()
        .filter(|item| item.status == status)
        .map(|item| now_ms.saturating_sub(millis_or_zero(since(item))).max(0))
        .collect();
    average_days(&spans)
}

fn average_days(spans: &[i64]) -> f64 {
    if spans.is_empty() {
        return 0.0;
    }
    let total: f64 = spans.iter().map(|span| millis_to_days(*span)).sum();
    round_one_decimal(total / spans.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp::MILLIS_PER_DAY;

    #[test]
    fn future_timestamps_clamp_to_zero_age() {
        let item = TriageItem::new("a", "A").with_timestamps(Some(10 * MILLIS_PER_DAY), None);
        assert_eq!(average_age(&[item], TriageStatus::Backlog, MILLIS_PER_DAY), 0.0);
    }

    #[test]
    fn week_start_respects_offset() {
        // 1970-01-05 was a Monday.
        let monday_utc = 4 * MILLIS_PER_DAY;
        let sunday_late_utc = monday_utc - 60 * 60 * 1000;
        assert_eq!(week_start_millis(monday_utc, 0), Some(monday_utc));
        // Sunday 23:00 UTC is already Monday 01:00 at UTC+2.
        assert_eq!(
            week_start_millis(sunday_late_utc, 120),
            Some(monday_utc - 2 * 60 * 60 * 1000)
        );
    }
}
