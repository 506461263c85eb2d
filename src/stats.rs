//! Per-number call statistics
//!
//! Folds parsed call records into direction buckets (today / last 7 days /
//! all time) and a histogram of normalized outcome labels. Records belong
//! to a number when their canonical phone ends with the query's digits.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Local, TimeZone};
use serde::Serialize;

use crate::calllog::{CallRecord, Direction};
use crate::phone;

/// Counters for one direction. `today` and `week` are tallied independently
/// but both only ever count records that are also in `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    pub today: u32,
    pub week: u32,
    pub total: u32,
}

/// Normalized status label -> occurrences
pub type StatusHistogram = BTreeMap<String, u32>;

/// Aggregated history for one queried number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallStats {
    /// Buckets present for at least one matching record; no ordering
    pub directions: HashMap<Direction, DirectionStats>,
    pub statuses: StatusHistogram,
}

impl CallStats {
    /// Bucket for `direction`, zeroed when no call matched it
    pub fn direction(&self, direction: Direction) -> DirectionStats {
        self.directions.get(&direction).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Number of matching records
    pub fn total_calls(&self) -> u32 {
        self.directions.values().map(|d| d.total).sum()
    }

    /// Outgoing, Incoming and Missed always, then Other when any call had it
    pub fn ordered_directions(&self) -> Vec<(Direction, DirectionStats)> {
        Direction::DISPLAY_ORDER
            .iter()
            .filter(|d| **d != Direction::Other || self.directions.contains_key(*d))
            .map(|d| (*d, self.direction(*d)))
            .collect()
    }

    /// Statuses sorted by count descending, ties by label
    pub fn statuses_by_count(&self) -> Vec<(&str, u32)> {
        let mut statuses: Vec<(&str, u32)> = self
            .statuses
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        statuses.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        statuses
    }
}

/// Aggregate `records` for `target` as of right now
pub fn aggregate(target: &str, records: &[CallRecord]) -> CallStats {
    aggregate_at(target, records, Local::now())
}

/// Aggregate `records` for `target` with time windows evaluated at `now`.
///
/// An empty (or digit-free) target matches nothing.
pub fn aggregate_at(target: &str, records: &[CallRecord], now: DateTime<Local>) -> CallStats {
    let target = phone::normalize(target);
    let mut stats = CallStats::default();
    if target.is_empty() {
        tracing::debug!("Empty phone query, no stats");
        return stats;
    }

    let today = now.date_naive();

    for record in records
        .iter()
        .filter(|r| phone::matches_suffix(&r.phone, &target))
    {
        let bucket = stats.directions.entry(record.direction).or_default();
        bucket.total += 1;
        if record.timestamp.date_naive() == today {
            bucket.today += 1;
        }
        if within_last_week(&record.timestamp, &now) {
            bucket.week += 1;
        }

        *stats
            .statuses
            .entry(normalize_status(&record.status))
            .or_insert(0) += 1;
    }

    tracing::debug!(
        "{} of {} calls matched {}",
        stats.total_calls(),
        records.len(),
        target
    );
    stats
}

/// Seven days back on the local wall clock, so a DST change in between
/// does not shift the window by an hour
fn within_last_week<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
    at.naive_local() >= now.naive_local() - Duration::days(7)
}

/// Collapse free-text outcomes into a few labels.
///
/// Substring tests run in priority order: answer, cancel, forbid, busy.
/// Anything else is title-cased; empty becomes `Other`.
pub fn normalize_status(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("answer") {
        "Answered".to_string()
    } else if lower.contains("cancel") {
        "Canceled".to_string()
    } else if lower.contains("forbid") {
        "Forbidden".to_string()
    } else if lower.contains("busy") {
        "Busy".to_string()
    } else if lower.is_empty() {
        "Other".to_string()
    } else {
        title_case(&lower)
    }
}

/// Uppercase every letter that follows a non-letter, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
