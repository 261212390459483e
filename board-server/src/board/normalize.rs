//! Per-day timetable normalization.
//!
//! Converts one day's raw OD timetable entries into [`TrainEntry`] records.
//! Each entry is handled independently: a malformed or non-serving entry
//! produces a [`Skip`] reason rather than failing the day, and skip counts
//! are aggregated for observability.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::warn;

use crate::domain::time::{on_service_date, parse_time_of_day};
use crate::domain::{StationId, TrainEntry, classify};
use crate::tdx::{DelayMap, TrainTimetable};

use super::config::BoardConfig;

/// Why a raw entry produced no board record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The stop list covers neither/only one of the queried stations —
    /// the train does not serve this route on this date.
    NotServing,

    /// A required time field was missing or unparseable.
    BadTime,
}

/// Aggregated skip reasons for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub not_serving: usize,
    pub bad_time: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.not_serving + self.bad_time
    }

    pub fn absorb(&mut self, other: SkipCounts) {
        self.not_serving += other.not_serving;
        self.bad_time += other.bad_time;
    }

    fn record(&mut self, skip: Skip) {
        match skip {
            Skip::NotServing => self.not_serving += 1,
            Skip::BadTime => self.bad_time += 1,
        }
    }
}

/// Result of normalizing one day's timetable.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub trains: Vec<TrainEntry>,
    pub skipped: SkipCounts,
}

/// Normalize one day's raw entries for an origin-destination pair.
///
/// `cross_night` is set when `date` is yesterday relative to `reference_now`:
/// times of day before noon then count as the following calendar day, so a
/// train that left at 23:50 arriving 00:10 lands on the right side of
/// midnight.
#[allow(clippy::too_many_arguments)]
pub fn normalize(
    entries: &[TrainTimetable],
    date: NaiveDate,
    origin: &StationId,
    destination: &StationId,
    delays: &DelayMap,
    reference_now: DateTime<FixedOffset>,
    cross_night: bool,
    config: &BoardConfig,
) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    outcome.trains.reserve(entries.len());

    for entry in entries {
        match normalize_entry(
            entry,
            date,
            origin,
            destination,
            delays,
            reference_now,
            cross_night,
            config,
        ) {
            Ok(train) => outcome.trains.push(train),
            Err(skip) => {
                if skip == Skip::BadTime {
                    warn!(
                        train_no = %entry.train_info.train_no,
                        %date,
                        "skipping entry with unusable time fields"
                    );
                }
                outcome.skipped.record(skip);
            }
        }
    }

    outcome
}

/// Normalize a single raw entry.
#[allow(clippy::too_many_arguments)]
fn normalize_entry(
    entry: &TrainTimetable,
    date: NaiveDate,
    origin: &StationId,
    destination: &StationId,
    delays: &DelayMap,
    reference_now: DateTime<FixedOffset>,
    cross_night: bool,
    config: &BoardConfig,
) -> Result<TrainEntry, Skip> {
    // Scan the stop list for both ends of the route. A train terminating
    // before the destination, or a data-quality gap, means no record.
    let dep_stop = entry
        .stop_times
        .iter()
        .find(|s| s.station_id == origin.as_str())
        .ok_or(Skip::NotServing)?;
    let arr_stop = entry
        .stop_times
        .iter()
        .find(|s| s.station_id == destination.as_str())
        .ok_or(Skip::NotServing)?;

    // Departure at origin, falling back to arrival for trains originating
    // here without a listed departure; symmetric at the destination.
    let dep_raw = dep_stop
        .departure_time
        .as_deref()
        .or(dep_stop.arrival_time.as_deref())
        .ok_or(Skip::BadTime)?;
    let arr_raw = arr_stop
        .arrival_time
        .as_deref()
        .or(arr_stop.departure_time.as_deref())
        .ok_or(Skip::BadTime)?;

    let dep_time = parse_time_of_day(dep_raw).map_err(|_| Skip::BadTime)?;
    let arr_time = parse_time_of_day(arr_raw).map_err(|_| Skip::BadTime)?;

    let sch_dep = on_service_date(date, dep_time, cross_night).ok_or(Skip::BadTime)?;
    let mut sch_arr = on_service_date(date, arr_time, cross_night).ok_or(Skip::BadTime)?;

    // Natural cross-midnight run: arrival before departure means the train
    // reaches the destination the next calendar day.
    if sch_arr < sch_dep {
        sch_arr += chrono::Duration::days(1);
    }

    let train_no = &entry.train_info.train_no;

    // Early departures are not modeled; clamp to zero-or-positive.
    let mut delay_mins = delays.get(train_no).copied().unwrap_or(0).max(0);

    // Staleness guard: a live reading for a departure that far out is
    // either inapplicable or about to change, so suppress it.
    if sch_dep - reference_now > config.delay_horizon() {
        delay_mins = 0;
    }

    let delay = chrono::Duration::minutes(delay_mins);
    let act_dep = sch_dep + delay;
    let act_arr = sch_arr + delay;

    let is_past = act_dep < reference_now - config.grace();

    let category = classify(entry.train_info.type_name());

    Ok(TrainEntry {
        no: train_no.clone(),
        category,
        sch_dep,
        sch_arr,
        delay_mins,
        act_dep,
        act_arr,
        is_past,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::tdx::mock::entry;

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate, hm: &str) -> DateTime<FixedOffset> {
        on_service_date(date, parse_time_of_day(hm).unwrap(), false).unwrap()
    }

    /// A morning reference point: 2024-01-01 08:00 +08:00.
    fn morning() -> DateTime<FixedOffset> {
        at(day(2024, 1, 1), "08:00")
    }

    fn run(
        entries: &[TrainTimetable],
        delays: &DelayMap,
        now: DateTime<FixedOffset>,
        cross_night: bool,
    ) -> NormalizeOutcome {
        normalize(
            entries,
            day(2024, 1, 1),
            &sid("1100"),
            &sid("1000"),
            delays,
            now,
            cross_night,
            &BoardConfig::default(),
        )
    }

    #[test]
    fn delay_shifts_both_ends() {
        let entries = vec![entry(
            "123",
            "自強",
            &[("1100", "08:00", "08:05"), ("1000", "08:40", "08:41")],
        )];
        let delays = DelayMap::from([("123".to_string(), 3)]);

        let outcome = run(&entries, &delays, morning(), false);
        assert_eq!(outcome.trains.len(), 1);

        let t = &outcome.trains[0];
        assert_eq!(t.delay_mins, 3);
        assert_eq!(t.act_dep - t.sch_dep, chrono::Duration::minutes(3));
        assert_eq!(t.act_arr - t.sch_arr, chrono::Duration::minutes(3));
        assert_eq!(t.sch_dep, at(day(2024, 1, 1), "08:05"));
        assert_eq!(t.act_dep, at(day(2024, 1, 1), "08:08"));
        assert!(!t.is_past);
        assert_eq!(t.category, Category::TzeChiang);
    }

    #[test]
    fn cross_midnight_arrival_advances_a_day() {
        let entries = vec![entry(
            "561",
            "莒光",
            &[("1100", "23:45", "23:50"), ("1000", "00:10", "00:12")],
        )];

        let outcome = run(&entries, &DelayMap::new(), at(day(2024, 1, 1), "23:00"), false);
        let t = &outcome.trains[0];
        assert_eq!(t.sch_dep, at(day(2024, 1, 1), "23:50"));
        assert_eq!(t.sch_arr, at(day(2024, 1, 2), "00:10"));
    }

    #[test]
    fn cross_night_hint_rolls_morning_times() {
        // Yesterday's timetable queried at 00:30: a train listed at 00:10
        // actually runs tonight, after midnight.
        let entries = vec![entry(
            "671",
            "區間",
            &[("1100", "00:05", "00:10"), ("1000", "00:40", "00:42")],
        )];
        let now = at(day(2024, 1, 2), "00:30");

        let outcome = normalize(
            &entries,
            day(2024, 1, 1), // yesterday
            &sid("1100"),
            &sid("1000"),
            &DelayMap::new(),
            now,
            true,
            &BoardConfig::default(),
        );

        let t = &outcome.trains[0];
        assert_eq!(t.sch_dep, at(day(2024, 1, 2), "00:10"));
        assert_eq!(t.sch_arr, at(day(2024, 1, 2), "00:40"));
    }

    #[test]
    fn staleness_guard_zeroes_far_future_delay() {
        // 15:00 departure seen at 08:00 is 7h ahead: suppress the reading
        let entries = vec![entry(
            "423",
            "普悠瑪",
            &[("1100", "14:55", "15:00"), ("1000", "15:40", "15:42")],
        )];
        let delays = DelayMap::from([("423".to_string(), 12)]);

        let outcome = run(&entries, &delays, morning(), false);
        let t = &outcome.trains[0];
        assert_eq!(t.delay_mins, 0);
        assert_eq!(t.act_dep, t.sch_dep);
    }

    #[test]
    fn near_future_delay_survives_the_guard() {
        // 09:00 departure seen at 08:00 is inside the horizon
        let entries = vec![entry(
            "425",
            "區間",
            &[("1100", "08:55", "09:00"), ("1000", "09:40", "09:42")],
        )];
        let delays = DelayMap::from([("425".to_string(), 4)]);

        let outcome = run(&entries, &delays, morning(), false);
        assert_eq!(outcome.trains[0].delay_mins, 4);
    }

    #[test]
    fn grace_window_boundaries() {
        // Departures 9 and 11 minutes before now: only the latter is past
        let entries = vec![
            entry(
                "801",
                "區間",
                &[("1100", "07:50", "07:51"), ("1000", "08:20", "08:21")],
            ),
            entry(
                "803",
                "區間",
                &[("1100", "07:48", "07:49"), ("1000", "08:18", "08:19")],
            ),
        ];

        let outcome = run(&entries, &DelayMap::new(), morning(), false);
        let by_no = |no: &str| outcome.trains.iter().find(|t| t.no == no).unwrap();

        assert!(!by_no("801").is_past); // 07:51, 9 minutes ago
        assert!(by_no("803").is_past); // 07:49, 11 minutes ago
    }

    #[test]
    fn negative_delay_clamped_to_zero() {
        let entries = vec![entry(
            "113",
            "自強",
            &[("1100", "08:10", "08:15"), ("1000", "08:50", "08:52")],
        )];
        let delays = DelayMap::from([("113".to_string(), -2)]);

        let outcome = run(&entries, &delays, morning(), false);
        let t = &outcome.trains[0];
        assert_eq!(t.delay_mins, 0);
        assert_eq!(t.act_dep, t.sch_dep);
    }

    #[test]
    fn entry_not_serving_route_is_skipped() {
        // Terminates before reaching the destination
        let entries = vec![
            entry("901", "區間", &[("1100", "08:00", "08:01"), ("1050", "08:20", "08:21")]),
            entry(
                "903",
                "區間",
                &[("1100", "09:00", "09:01"), ("1000", "09:30", "09:31")],
            ),
        ];

        let outcome = run(&entries, &DelayMap::new(), morning(), false);
        assert_eq!(outcome.trains.len(), 1);
        assert_eq!(outcome.trains[0].no, "903");
        assert_eq!(outcome.skipped.not_serving, 1);
        assert_eq!(outcome.skipped.bad_time, 0);
    }

    #[test]
    fn unparseable_time_is_skipped_and_counted() {
        let entries = vec![entry(
            "905",
            "區間",
            &[("1100", "garbage", "nope"), ("1000", "09:30", "09:31")],
        )];

        let outcome = run(&entries, &DelayMap::new(), morning(), false);
        assert!(outcome.trains.is_empty());
        assert_eq!(outcome.skipped.bad_time, 1);
        assert_eq!(outcome.skipped.total(), 1);
    }

    #[test]
    fn origin_without_departure_uses_arrival() {
        // Terminus-style record at the origin stop: departure absent
        let mut e = entry("907", "區間", &[("1000", "09:30", "09:31")]);
        e.stop_times.insert(
            0,
            crate::tdx::StopTime {
                stop_sequence: Some(1),
                station_id: "1100".into(),
                station_name: None,
                arrival_time: Some("08:59".into()),
                departure_time: None,
            },
        );

        let outcome = run(&[e], &DelayMap::new(), morning(), false);
        assert_eq!(outcome.trains.len(), 1);
        assert_eq!(outcome.trains[0].sch_dep, at(day(2024, 1, 1), "08:59"));
    }

    #[test]
    fn skip_counts_absorb() {
        let mut a = SkipCounts {
            not_serving: 2,
            bad_time: 1,
        };
        a.absorb(SkipCounts {
            not_serving: 1,
            bad_time: 0,
        });
        assert_eq!(a.not_serving, 3);
        assert_eq!(a.total(), 4);
    }
}
