//! Multi-day reconciliation.
//!
//! Merges normalized entries from up to three service days into one
//! deduplicated, time-ordered list. Merge order is fixed
//! (yesterday → today → tomorrow) so first-occurrence-wins deduplication
//! and the stable sort are deterministic.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Timelike};

use crate::domain::TrainEntry;
use crate::domain::time::start_of_day;

use super::config::BoardConfig;

/// Whether yesterday's timetable should be merged in at all.
///
/// Only in the early morning can a train from yesterday's timetable still
/// be en route past midnight; later in the day the extra upstream/cache
/// call would buy nothing.
pub fn include_yesterday(reference_now: DateTime<FixedOffset>, config: &BoardConfig) -> bool {
    reference_now.time().hour() < config.overnight_cutoff_hour
}

/// Merge normalized day lists into the final board sequence.
///
/// - dedup key: (actual departure instant, train number); first wins
/// - visibility window: [start of today, now + 24h or 48h]
/// - output sorted ascending by actual departure (stable; ties keep
///   merge order)
pub fn reconcile(
    yesterday: Option<Vec<TrainEntry>>,
    today: Vec<TrainEntry>,
    tomorrow: Option<Vec<TrainEntry>>,
    reference_now: DateTime<FixedOffset>,
    include_tomorrow: bool,
    config: &BoardConfig,
) -> Vec<TrainEntry> {
    let lower = start_of_day(reference_now);
    let upper = reference_now + config.lookahead(include_tomorrow);

    let mut seen: HashSet<(i64, String)> = HashSet::new();
    let mut merged: Vec<TrainEntry> = Vec::new();

    let days = yesterday
        .into_iter()
        .flatten()
        .chain(today)
        .chain(tomorrow.into_iter().flatten());

    for entry in days {
        let key = entry.sort_key();
        if key < lower || key > upper {
            continue;
        }
        if !seen.insert(entry.dedup_key()) {
            continue;
        }
        merged.push(entry);
    }

    merged.sort_by_key(|e| e.sort_key());

    merged
}
