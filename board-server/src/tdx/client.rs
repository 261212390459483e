//! TDX HTTP client.
//!
//! Authenticated access to the three upstream feeds the board needs: the
//! per-pair daily timetable, the system-wide live delay table, and the
//! station list. Each call observes the `x-ratelimit-remaining` response
//! header and records a one-line status string for diagnostics; quota is
//! never used for flow control.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::domain::StationId;

use super::auth::TokenProvider;
use super::error::TdxError;
use super::types::{LiveDelay, OdTimetableResponse, StationDto, StationsResponse, TrainTimetable};

/// Default base URL for the TDX basic API.
const DEFAULT_BASE_URL: &str = "https://tdx.transportdata.tw/api/basic";

/// Train number → current delay in minutes, as reported by the live feed.
pub type DelayMap = HashMap<String, i64>;

/// Configuration for the TDX client.
#[derive(Debug, Clone)]
pub struct TdxConfig {
    /// Base URL for the API (defaults to production TDX)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TdxConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TdxConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Last-observed upstream status per feed, for the response diagnostics
/// block. Purely informational.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Status of the most recent timetable fetch.
    pub route_status: String,

    /// Status of the most recent live-delay fetch.
    pub delay_status: String,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            route_status: "no request yet".to_string(),
            delay_status: "no request yet".to_string(),
        }
    }
}

/// TDX API client.
#[derive(Clone)]
pub struct TdxClient {
    http: reqwest::Client,
    base_url: String,
    auth: TokenProvider,
    status: Arc<RwLock<Diagnostics>>,
}

impl TdxClient {
    /// Create a new TDX client with the given configuration.
    pub fn new(config: TdxConfig, auth: TokenProvider) -> Result<Self, TdxError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            auth,
            status: Arc::new(RwLock::new(Diagnostics::default())),
        })
    }

    /// Fetch the daily timetable for trains serving an origin-destination
    /// pair on the given date.
    ///
    /// Single attempt, no internal retry: freshness policy and fallback
    /// belong to the caching layer.
    pub async fn fetch_timetable(
        &self,
        origin: &StationId,
        destination: &StationId,
        date: NaiveDate,
    ) -> Result<Vec<TrainTimetable>, TdxError> {
        let token = self.auth.get_token().await?;

        let url = format!(
            "{}/v3/Rail/TRA/DailyTrainTimetable/OD/{}/to/{}/{}",
            self.base_url,
            origin,
            destination,
            date.format("%Y-%m-%d"),
        );

        debug!(%origin, %destination, %date, "fetching OD timetable");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("$format", "JSON")])
            .send()
            .await?;

        let status = response.status();
        self.record_route_status(status_line(status.as_u16(), response.headers()));

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TdxError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TdxError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TdxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: OdTimetableResponse =
            serde_json::from_str(&body).map_err(|e| TdxError::json(e, &body))?;

        Ok(parsed.train_timetables)
    }

    /// Fetch the current system-wide live delay table.
    pub async fn fetch_live_delays(&self) -> Result<DelayMap, TdxError> {
        let token = self.auth.get_token().await?;

        let url = format!("{}/v2/Rail/TRA/LiveTrainDelay", self.base_url);

        debug!("fetching live delay table");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("$format", "JSON")])
            .send()
            .await?;

        let status = response.status();
        self.record_delay_status(status_line(status.as_u16(), response.headers()));

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TdxError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TdxError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TdxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let rows: Vec<LiveDelay> =
            serde_json::from_str(&body).map_err(|e| TdxError::json(e, &body))?;

        Ok(delay_map(rows))
    }

    /// Fetch the full TRA station list.
    pub async fn fetch_stations(&self) -> Result<Vec<StationDto>, TdxError> {
        let token = self.auth.get_token().await?;

        let url = format!("{}/v3/Rail/TRA/Station", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("$format", "JSON")])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TdxError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TdxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: StationsResponse =
            serde_json::from_str(&body).map_err(|e| TdxError::json(e, &body))?;

        Ok(parsed.stations)
    }

    /// Snapshot of the last-observed upstream statuses.
    pub fn diagnostics(&self) -> Diagnostics {
        self.status
            .read()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    fn record_route_status(&self, line: String) {
        if let Ok(mut guard) = self.status.write() {
            guard.route_status = line;
        }
    }

    fn record_delay_status(&self, line: String) {
        if let Ok(mut guard) = self.status.write() {
            guard.delay_status = line;
        }
    }
}

/// Collapse the delay feed into a train-number keyed map.
///
/// The feed reports one row per delayed train at its current station;
/// duplicate train numbers keep the larger reading.
fn delay_map(rows: Vec<LiveDelay>) -> DelayMap {
    let mut map = DelayMap::with_capacity(rows.len());
    for row in rows {
        map.entry(row.train_no)
            .and_modify(|d| *d = (*d).max(row.delay_time))
            .or_insert(row.delay_time);
    }
    map
}

/// Format an upstream status line, including the remaining daily quota
/// when the header is present.
fn status_line(status: u16, headers: &HeaderMap) -> String {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok());

    match remaining {
        Some(n) => format!("API {status} (remaining {n})"),
        None => format!("API {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn config_builder() {
        let config = TdxConfig::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = TdxConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn status_line_with_quota() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("48"));
        assert_eq!(status_line(200, &headers), "API 200 (remaining 48)");
    }

    #[test]
    fn status_line_without_quota() {
        assert_eq!(status_line(429, &HeaderMap::new()), "API 429");
    }

    #[test]
    fn delay_map_keeps_larger_duplicate() {
        let rows = vec![
            LiveDelay {
                train_no: "123".into(),
                delay_time: 3,
                station_id: None,
                update_time: None,
            },
            LiveDelay {
                train_no: "123".into(),
                delay_time: 7,
                station_id: None,
                update_time: None,
            },
            LiveDelay {
                train_no: "456".into(),
                delay_time: 0,
                station_id: None,
                update_time: None,
            },
        ];

        let map = delay_map(rows);
        assert_eq!(map.get("123"), Some(&7));
        assert_eq!(map.get("456"), Some(&0));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn client_creation() {
        let auth = TokenProvider::new(super::super::AuthConfig::new("id", "secret")).unwrap();
        let client = TdxClient::new(TdxConfig::default(), auth);
        assert!(client.is_ok());
    }

    // Integration tests against the live API require real TDX credentials
    // and are intentionally absent; the mock module covers the consumers.
}
