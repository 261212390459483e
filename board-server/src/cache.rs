//! Freshness-aware caching for TDX responses.
//!
//! Timetables are stable within a service day while delays are volatile,
//! so one TTL cannot serve both: too short wastes daily quota, too long
//! shows stale delays. [`CachedTdxClient`] fronts the raw client with a
//! per-data-class freshness policy (timetables ~12h, delays ~60s).
//!
//! Entries are *retained* beyond their freshness TTL: when an upstream
//! fetch fails, a stale value is returned with `degraded` set instead of
//! failing the request. Retention is bounded by the backing cache's own
//! time-to-live.
//!
//! Concurrent misses on the same key may each fetch upstream; refreshes
//! are idempotent last-writer-wins overwrites, so no single-flight guard.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::warn;

use crate::domain::StationId;
use crate::tdx::{DelayMap, Diagnostics, TdxClient, TdxError, TrainTimetable};

/// A cache read result, flagged when it came from a stale entry because
/// the refresh fetch failed.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Fetched<T> {
    /// A fresh, non-degraded value.
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }
}

/// A cached value with the instant it was fetched.
#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    fetched_at: Instant,
}

/// Generic freshness cache.
///
/// `retention` bounds how long stale values stay available for failure
/// fallback; freshness itself is checked per call against the supplied TTL,
/// since the backing cache has a single time-to-live per instance.
pub struct Freshness<K, V> {
    entries: MokaCache<K, Slot<V>>,
}

impl<K, V> Freshness<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache retaining entries for `retention` with at most
    /// `max_capacity` entries.
    pub fn new(retention: Duration, max_capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(retention)
            .max_capacity(max_capacity)
            .build();

        Self { entries }
    }

    /// Read-through lookup.
    ///
    /// - entry present and younger than `ttl`: returned as-is, no fetch
    /// - otherwise `fetch` runs; success overwrites the entry
    /// - fetch failure with a stale entry present: the stale value is
    ///   returned flagged `degraded`
    /// - fetch failure with nothing cached: the error propagates
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: K,
        ttl: Duration,
        fetch: F,
    ) -> Result<Fetched<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: std::fmt::Display,
    {
        let stale = self.entries.get(&key).await;

        if let Some(slot) = &stale {
            if slot.fetched_at.elapsed() <= ttl {
                return Ok(Fetched::fresh(slot.value.clone()));
            }
        }

        match fetch().await {
            Ok(value) => {
                self.entries
                    .insert(
                        key,
                        Slot {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                        },
                    )
                    .await;
                Ok(Fetched::fresh(value))
            }
            Err(err) => match stale {
                Some(slot) => {
                    warn!(%err, "upstream fetch failed, serving stale cache entry");
                    Ok(Fetched {
                        value: slot.value,
                        degraded: true,
                    })
                }
                None => Err(err),
            },
        }
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Drop all cached entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

/// TTL policy per data class.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Freshness window for per-route, per-date timetables.
    pub timetable_ttl: Duration,

    /// Freshness window for the live delay table.
    pub delay_ttl: Duration,

    /// How long stale entries remain available for failure fallback.
    pub retention: Duration,

    /// Maximum number of cached timetables.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timetable_ttl: Duration::from_secs(12 * 60 * 60),
            delay_ttl: Duration::from_secs(60),
            retention: Duration::from_secs(24 * 60 * 60),
            max_capacity: 500,
        }
    }
}

/// Timetable cache key: one entry per route and service date.
type RouteKey = (StationId, StationId, NaiveDate);

/// TDX client with freshness caching.
///
/// Wraps a [`TdxClient`] and applies the [`CacheConfig`] TTL policy.
pub struct CachedTdxClient {
    client: TdxClient,
    config: CacheConfig,
    timetables: Freshness<RouteKey, Arc<Vec<TrainTimetable>>>,
    delays: Freshness<(), Arc<DelayMap>>,
}

impl CachedTdxClient {
    /// Create a new cached client.
    pub fn new(client: TdxClient, config: CacheConfig) -> Self {
        let timetables = Freshness::new(config.retention, config.max_capacity);
        // Single entry; the delay table is global
        let delays = Freshness::new(config.retention, 1);

        Self {
            client,
            config,
            timetables,
            delays,
        }
    }

    /// Get the timetable for a route and date, fetching at most once per
    /// freshness window.
    pub async fn timetable(
        &self,
        origin: &StationId,
        destination: &StationId,
        date: NaiveDate,
    ) -> Result<Fetched<Arc<Vec<TrainTimetable>>>, TdxError> {
        let key = (origin.clone(), destination.clone(), date);
        let client = &self.client;

        self.timetables
            .get_or_fetch(key, self.config.timetable_ttl, || async move {
                client
                    .fetch_timetable(origin, destination, date)
                    .await
                    .map(Arc::new)
            })
            .await
    }

    /// Get the live delay table, fetching at most once per freshness window.
    pub async fn live_delays(&self) -> Result<Fetched<Arc<DelayMap>>, TdxError> {
        let client = &self.client;

        self.delays
            .get_or_fetch((), self.config.delay_ttl, || async move {
                client.fetch_live_delays().await.map(Arc::new)
            })
            .await
    }

    /// Last-observed upstream statuses.
    pub fn diagnostics(&self) -> Diagnostics {
        self.client.diagnostics()
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &TdxClient {
        &self.client
    }

    /// Number of cached timetables.
    pub fn timetable_entry_count(&self) -> u64 {
        self.timetables.entry_count()
    }

    /// Drop all cached entries.
    pub fn invalidate_all(&self) {
        self.timetables.invalidate_all();
        self.delays.invalidate_all();
    }
}
