//! Time handling for the TRA network.
//!
//! The whole network runs on a single fixed offset (+08:00, no DST), so
//! everything here works with `DateTime<FixedOffset>`. Upstream timetables
//! carry bare "HH:MM" times of day; combining them with a service date and
//! handling day rollover is the normalizer's main source of subtlety:
//!
//! - A train that departs at 23:50 and arrives at 00:10 crosses midnight
//!   naturally; the arrival belongs to the next calendar day.
//! - When querying *yesterday's* timetable to catch trains still running
//!   past midnight, times before noon are treated as belonging to the day
//!   after the query date (the "cross-night" rule).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// The fixed UTC offset the TRA network operates in (+08:00).
pub fn taipei() -> FixedOffset {
    // 8 * 3600 is well inside the valid offset range
    FixedOffset::east_opt(8 * 3600).expect("+08:00 is a valid offset")
}

/// Error returned when parsing an invalid time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day: {value}")]
pub struct InvalidTime {
    value: String,
}

/// Parse an upstream time-of-day field.
///
/// TDX uses "HH:MM"; "HH:MM:SS" is accepted as well since a few feeds
/// include seconds.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, InvalidTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| InvalidTime {
            value: s.to_string(),
        })
}

/// Combine a service date with a time of day into a +08:00 timestamp.
///
/// With `cross_night` set, times before noon are taken to have rolled past
/// midnight into the day after `date`. Returns `None` only on calendar
/// overflow.
pub fn on_service_date(
    date: NaiveDate,
    time: NaiveTime,
    cross_night: bool,
) -> Option<DateTime<FixedOffset>> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0)?;
    let date = if cross_night && time < noon {
        date.succ_opt()?
    } else {
        date
    };

    NaiveDateTime::new(date, time)
        .and_local_timezone(taipei())
        .single()
}

/// Local midnight at the start of the given instant's calendar day.
pub fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    NaiveDateTime::new(now.date_naive(), NaiveTime::MIN)
        .and_local_timezone(now.timezone())
        .single()
        .expect("fixed offsets have no ambiguous local times")
}

/// Format a timestamp as "HH:MM" for display.
pub fn fmt_hm(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%H:%M").to_string()
}

/// Format a timestamp as "HH:MM:SS" for display.
pub fn fmt_hms(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_hm() {
        let t = parse_time_of_day("08:05").unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 5));
    }

    #[test]
    fn parse_hms() {
        let t = parse_time_of_day("23:59:30").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 30));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_time_of_day("").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("8h05").is_err());
        assert!(parse_time_of_day("08:61").is_err());
    }

    #[test]
    fn combine_plain() {
        let ts = on_service_date(
            date(2024, 1, 1),
            parse_time_of_day("08:05").unwrap(),
            false,
        )
        .unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T08:05:00+08:00");
    }

    #[test]
    fn cross_night_rolls_morning_times() {
        // Querying yesterday (Dec 31) for a train arriving 00:10: the
        // arrival actually happens on Jan 1.
        let ts = on_service_date(
            date(2023, 12, 31),
            parse_time_of_day("00:10").unwrap(),
            true,
        )
        .unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:10:00+08:00");
    }

    #[test]
    fn cross_night_leaves_evening_times() {
        let ts = on_service_date(
            date(2023, 12, 31),
            parse_time_of_day("23:50").unwrap(),
            true,
        )
        .unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-12-31T23:50:00+08:00");
    }

    #[test]
    fn noon_is_not_rolled() {
        let ts = on_service_date(
            date(2023, 12, 31),
            parse_time_of_day("12:00").unwrap(),
            true,
        )
        .unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-12-31T12:00:00+08:00");
    }

    #[test]
    fn start_of_day_is_local_midnight() {
        let now = on_service_date(
            date(2024, 1, 1),
            parse_time_of_day("08:00").unwrap(),
            false,
        )
        .unwrap();
        assert_eq!(start_of_day(now).to_rfc3339(), "2024-01-01T00:00:00+08:00");
    }

    #[test]
    fn fmt_helpers() {
        let ts = on_service_date(
            date(2024, 1, 1),
            parse_time_of_day("08:05").unwrap(),
            false,
        )
        .unwrap();
        assert_eq!(fmt_hm(&ts), "08:05");
        assert_eq!(fmt_hms(&ts), "08:05:00");
    }
}
