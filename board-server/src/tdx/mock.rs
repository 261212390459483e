//! Mock timetable source for testing without TDX access.
//!
//! Serves fixture timetables and delays behind the same
//! [`TimetableSource`] seam the cached client implements, with switches
//! to simulate the failure modes the board must absorb: a day's fetch
//! failing, the delay fetch failing, or the delay table arriving from a
//! stale cache entry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::board::TimetableSource;
use crate::cache::Fetched;
use crate::domain::StationId;

use super::client::{DelayMap, Diagnostics};
use super::error::TdxError;
use super::types::{NameType, StopTime, TrainInfo, TrainTimetable};

/// Build a fixture timetable entry.
///
/// `stops` is (station id, arrival "HH:MM", departure "HH:MM") in stop
/// order.
pub fn entry(train_no: &str, type_name: &str, stops: &[(&str, &str, &str)]) -> TrainTimetable {
    TrainTimetable {
        train_info: TrainInfo {
            train_no: train_no.to_string(),
            train_type_name: Some(NameType {
                zh: Some(type_name.to_string()),
                en: None,
            }),
            direction: Some(0),
        },
        stop_times: stops
            .iter()
            .enumerate()
            .map(|(i, (station_id, arrival, departure))| StopTime {
                stop_sequence: Some(i as u32 + 1),
                station_id: station_id.to_string(),
                station_name: None,
                arrival_time: Some(arrival.to_string()),
                departure_time: Some(departure.to_string()),
            })
            .collect(),
    }
}

/// How the mock's delay fetch behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DelayMode {
    /// Serve the configured delays as fresh.
    #[default]
    Fresh,
    /// Serve the configured delays flagged degraded (stale cache fallback).
    Degraded,
    /// Fail outright.
    Fail,
}

/// Fixture-backed timetable source.
#[derive(Debug, Clone, Default)]
pub struct MockTdx {
    timetables: HashMap<(String, String, NaiveDate), Vec<TrainTimetable>>,
    delays: DelayMap,
    delay_mode: DelayMode,
    failing_dates: HashSet<NaiveDate>,
}

impl MockTdx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a day's timetable for a station pair.
    pub fn with_timetable(
        mut self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        entries: Vec<TrainTimetable>,
    ) -> Self {
        self.timetables
            .insert((origin.to_string(), destination.to_string(), date), entries);
        self
    }

    /// Register a live delay reading.
    pub fn with_delay(mut self, train_no: &str, minutes: i64) -> Self {
        self.delays.insert(train_no.to_string(), minutes);
        self
    }

    /// Serve delays flagged as degraded (as if from a stale cache entry).
    pub fn with_degraded_delays(mut self) -> Self {
        self.delay_mode = DelayMode::Degraded;
        self
    }

    /// Make the delay fetch fail with no fallback.
    pub fn with_failed_delays(mut self) -> Self {
        self.delay_mode = DelayMode::Fail;
        self
    }

    /// Make timetable fetches for the given date fail.
    pub fn with_failed_timetable(mut self, date: NaiveDate) -> Self {
        self.failing_dates.insert(date);
        self
    }
}

impl TimetableSource for MockTdx {
    async fn timetable(
        &self,
        origin: &StationId,
        destination: &StationId,
        date: NaiveDate,
    ) -> Result<Fetched<Arc<Vec<TrainTimetable>>>, TdxError> {
        if self.failing_dates.contains(&date) {
            return Err(TdxError::Api {
                status: 503,
                message: format!("mock failure for {date}"),
            });
        }

        let key = (
            origin.as_str().to_string(),
            destination.as_str().to_string(),
            date,
        );

        // An unregistered day is a valid empty timetable, not an error
        let entries = self.timetables.get(&key).cloned().unwrap_or_default();

        Ok(Fetched::fresh(Arc::new(entries)))
    }

    async fn live_delays(&self) -> Result<Fetched<Arc<DelayMap>>, TdxError> {
        match self.delay_mode {
            DelayMode::Fresh => Ok(Fetched::fresh(Arc::new(self.delays.clone()))),
            DelayMode::Degraded => Ok(Fetched {
                value: Arc::new(self.delays.clone()),
                degraded: true,
            }),
            DelayMode::Fail => Err(TdxError::Api {
                status: 503,
                message: "mock delay failure".to_string(),
            }),
        }
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            route_status: "mock".to_string(),
            delay_status: "mock".to_string(),
        }
    }
}
