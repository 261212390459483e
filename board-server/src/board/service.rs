//! Board orchestration.
//!
//! [`BoardService`] runs the whole pipeline for one request: decide which
//! service days matter, pull them and the delay table through a
//! [`TimetableSource`], normalize each day, and reconcile into the final
//! list. The source trait is the seam that keeps the engine testable
//! without a network (the cached client in production, fixtures in tests).

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::{debug, warn};

use crate::cache::{CachedTdxClient, Fetched};
use crate::domain::{StationId, TrainEntry};
use crate::stations::Station;
use crate::tdx::{DelayMap, Diagnostics, TdxError, TrainTimetable};

use super::config::BoardConfig;
use super::normalize::{SkipCounts, normalize};
use super::reconcile::{include_yesterday, reconcile};

/// Provider of raw timetable and delay data.
///
/// Implemented by [`CachedTdxClient`] for production and by the mock in
/// `tdx::mock` for tests and offline development.
pub trait TimetableSource {
    /// One day's timetable for an origin-destination pair.
    fn timetable(
        &self,
        origin: &StationId,
        destination: &StationId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Fetched<Arc<Vec<TrainTimetable>>>, TdxError>> + Send;

    /// The current system-wide delay table.
    fn live_delays(&self) -> impl Future<Output = Result<Fetched<Arc<DelayMap>>, TdxError>> + Send;

    /// Last-observed upstream statuses, for the diagnostics block.
    fn diagnostics(&self) -> Diagnostics;
}

impl TimetableSource for CachedTdxClient {
    async fn timetable(
        &self,
        origin: &StationId,
        destination: &StationId,
        date: NaiveDate,
    ) -> Result<Fetched<Arc<Vec<TrainTimetable>>>, TdxError> {
        CachedTdxClient::timetable(self, origin, destination, date).await
    }

    async fn live_delays(&self) -> Result<Fetched<Arc<DelayMap>>, TdxError> {
        CachedTdxClient::live_delays(self).await
    }

    fn diagnostics(&self) -> Diagnostics {
        CachedTdxClient::diagnostics(self)
    }
}

/// One board request: a resolved station pair and the look-ahead flag.
#[derive(Debug, Clone)]
pub struct BoardRequest {
    pub origin: Station,
    pub destination: Station,
    pub include_tomorrow: bool,
}

/// The assembled board for one request.
#[derive(Debug, Clone)]
pub struct Board {
    /// When the board was generated (the request's reference instant).
    pub generated_at: DateTime<FixedOffset>,

    pub origin: Station,
    pub destination: Station,

    /// Live delay data could not be freshly obtained; delays shown are
    /// stale or zeroed.
    pub delay_failed: bool,

    /// Today's timetable came from a stale cache entry.
    pub route_degraded: bool,

    /// Final reconciled sequence, ascending by actual departure.
    pub trains: Vec<TrainEntry>,

    /// Raw entries that produced no record, by reason.
    pub skipped: SkipCounts,

    /// Upstream status strings.
    pub diagnostics: Diagnostics,
}

/// Errors that abort a board request.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Today's timetable is the one required day; with it gone there is
    /// nothing worth showing.
    #[error("today's timetable unavailable: {0}")]
    TodayUnavailable(#[source] TdxError),
}

/// Builds boards from a timetable source.
pub struct BoardService<S> {
    source: S,
    config: BoardConfig,
}

impl<S: TimetableSource> BoardService<S> {
    pub fn new(source: S, config: BoardConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Build the board for a station pair at the given reference instant.
    ///
    /// Day-level failures other than today's are absorbed: that day simply
    /// contributes no entries. A total delay-fetch failure zeroes delays
    /// and flags the board as delay-degraded.
    pub async fn build(
        &self,
        request: &BoardRequest,
        now: DateTime<FixedOffset>,
    ) -> Result<Board, BoardError> {
        let origin = &request.origin.id;
        let destination = &request.destination.id;
        let today = now.date_naive();

        // Today is the one required day.
        let today_fetch = self
            .source
            .timetable(origin, destination, today)
            .await
            .map_err(BoardError::TodayUnavailable)?;
        let route_degraded = today_fetch.degraded;

        // Yesterday: only worth fetching in the early morning, when trains
        // from its timetable can still be en route.
        let mut yesterday_raw: Option<(Fetched<Arc<Vec<TrainTimetable>>>, NaiveDate)> = None;
        if include_yesterday(now, &self.config) {
            if let Some(date) = today.pred_opt() {
                match self.source.timetable(origin, destination, date).await {
                    Ok(fetched) => yesterday_raw = Some((fetched, date)),
                    Err(err) => warn!(%err, "yesterday's timetable unavailable, omitting day"),
                }
            }
        }

        // Tomorrow: only on explicit request.
        let mut tomorrow_raw: Option<(Fetched<Arc<Vec<TrainTimetable>>>, NaiveDate)> = None;
        if request.include_tomorrow {
            if let Some(date) = today.succ_opt() {
                match self.source.timetable(origin, destination, date).await {
                    Ok(fetched) => tomorrow_raw = Some((fetched, date)),
                    Err(err) => warn!(%err, "tomorrow's timetable unavailable, omitting day"),
                }
            }
        }

        // Delays last: volatile, so fetch as close to assembly as possible.
        let (delays, delay_failed) = match self.source.live_delays().await {
            Ok(fetched) => (fetched.value, fetched.degraded),
            Err(err) => {
                warn!(%err, "live delay fetch failed, treating all delays as zero");
                (Arc::new(DelayMap::new()), true)
            }
        };

        let mut skipped = SkipCounts::default();

        let yesterday_entries = yesterday_raw.map(|(fetched, date)| {
            let out = normalize(
                &fetched.value,
                date,
                origin,
                destination,
                &delays,
                now,
                true, // cross-night: morning times belong to today
                &self.config,
            );
            skipped.absorb(out.skipped);
            out.trains
        });

        let today_out = normalize(
            &today_fetch.value,
            today,
            origin,
            destination,
            &delays,
            now,
            false,
            &self.config,
        );
        skipped.absorb(today_out.skipped);

        let tomorrow_entries = tomorrow_raw.map(|(fetched, date)| {
            let out = normalize(
                &fetched.value,
                date,
                origin,
                destination,
                &delays,
                now,
                false,
                &self.config,
            );
            skipped.absorb(out.skipped);
            out.trains
        });

        let trains = reconcile(
            yesterday_entries,
            today_out.trains,
            tomorrow_entries,
            now,
            request.include_tomorrow,
            &self.config,
        );

        debug!(
            trains = trains.len(),
            skipped = skipped.total(),
            delay_failed,
            "board assembled"
        );

        Ok(Board {
            generated_at: now,
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            delay_failed,
            route_degraded,
            trains,
            skipped,
            diagnostics: self.source.diagnostics(),
        })
    }
}
