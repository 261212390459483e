//! Normalized train record.

use chrono::{DateTime, FixedOffset};

use super::Category;

/// A single train on the board, normalized for one origin-destination pair.
///
/// All timestamps are absolute +08:00 instants: day rollover and delay
/// application have already happened by the time one of these exists.
/// Train numbers are unique per calendar day only, so identity across
/// overlapping day-queries is the (actual departure instant, train number)
/// pair — see [`TrainEntry::dedup_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainEntry {
    /// Train number, e.g. "123". Unique within one service day.
    pub no: String,

    /// Display category derived from the raw type name.
    pub category: Category,

    /// Scheduled departure from the origin.
    pub sch_dep: DateTime<FixedOffset>,

    /// Scheduled arrival at the destination.
    pub sch_arr: DateTime<FixedOffset>,

    /// Delay applied, in minutes (zero or positive).
    pub delay_mins: i64,

    /// Delay-adjusted departure.
    pub act_dep: DateTime<FixedOffset>,

    /// Delay-adjusted arrival.
    pub act_arr: DateTime<FixedOffset>,

    /// Whether the train departed more than the grace window ago.
    pub is_past: bool,
}

impl TrainEntry {
    /// Chronological sort key: the actual (delay-adjusted) departure.
    pub fn sort_key(&self) -> DateTime<FixedOffset> {
        self.act_dep
    }

    /// Identity for deduplication across overlapping day-queries.
    pub fn dedup_key(&self) -> (i64, String) {
        (self.act_dep.timestamp(), self.no.clone())
    }
}
