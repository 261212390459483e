//! TDX API response DTOs.
//!
//! These types map directly to the TDX JSON responses. Fields the board
//! does not consume are omitted, and `Option` is used liberally because
//! TDX drops fields rather than sending nulls in several feeds. Anything
//! malformed becomes a typed error at the fetch boundary instead of
//! leaking into normalization.

use serde::Deserialize;

/// Response from the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The bearer token to present to data endpoints.
    pub access_token: String,

    /// Token lifetime in seconds. TDX reports 86400; absent in some
    /// error-adjacent responses.
    pub expires_in: Option<u64>,
}

/// Bilingual name wrapper used throughout TDX.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameType {
    /// Traditional Chinese name.
    #[serde(rename = "Zh_tw")]
    pub zh: Option<String>,

    /// Romanised name.
    #[serde(rename = "En")]
    pub en: Option<String>,
}

impl NameType {
    /// Preferred display form: Chinese, falling back to romanised.
    pub fn display(&self) -> &str {
        self.zh
            .as_deref()
            .or(self.en.as_deref())
            .unwrap_or_default()
    }
}

/// Response from the v3 origin-destination daily timetable endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OdTimetableResponse {
    /// When the upstream dataset was last updated (ISO 8601).
    #[serde(rename = "UpdateTime")]
    pub update_time: Option<String>,

    /// The service date the query was for ("yyyy-MM-dd").
    #[serde(rename = "TrainDate")]
    pub train_date: Option<String>,

    /// Trains serving the pair on that date.
    #[serde(rename = "TrainTimetables", default)]
    pub train_timetables: Vec<TrainTimetable>,
}

/// One train's timetable for a single service date.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainTimetable {
    #[serde(rename = "TrainInfo")]
    pub train_info: TrainInfo,

    /// Ordered stop list. For the OD endpoint this covers the queried
    /// pair and everything between, but defensively may omit either end.
    #[serde(rename = "StopTimes", default)]
    pub stop_times: Vec<StopTime>,
}

/// Static per-train attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainInfo {
    /// Train number, unique within one service day.
    #[serde(rename = "TrainNo")]
    pub train_no: String,

    /// Raw train type name, e.g. "自強(3000)".
    #[serde(rename = "TrainTypeName")]
    pub train_type_name: Option<NameType>,

    /// 0 = southbound (順行), 1 = northbound (逆行).
    #[serde(rename = "Direction")]
    pub direction: Option<i32>,
}

impl TrainInfo {
    /// The type name to classify on (Chinese preferred).
    pub fn type_name(&self) -> &str {
        self.train_type_name
            .as_ref()
            .map(|n| n.display())
            .unwrap_or_default()
    }
}

/// A single scheduled stop.
#[derive(Debug, Clone, Deserialize)]
pub struct StopTime {
    /// 1-based position in the stop list.
    #[serde(rename = "StopSequence")]
    pub stop_sequence: Option<u32>,

    /// TRA station identifier.
    #[serde(rename = "StationID")]
    pub station_id: String,

    /// Station name (informational only; the table module is authoritative).
    #[serde(rename = "StationName")]
    pub station_name: Option<NameType>,

    /// Scheduled arrival, "HH:MM". Absent at a train's origin.
    #[serde(rename = "ArrivalTime")]
    pub arrival_time: Option<String>,

    /// Scheduled departure, "HH:MM". Absent at a train's terminus.
    #[serde(rename = "DepartureTime")]
    pub departure_time: Option<String>,
}

/// One row of the v2 live delay feed (the endpoint returns a bare array).
#[derive(Debug, Clone, Deserialize)]
pub struct LiveDelay {
    #[serde(rename = "TrainNo")]
    pub train_no: String,

    /// Delay in whole minutes. Upstream reports 0 for on-time trains.
    #[serde(rename = "DelayTime")]
    pub delay_time: i64,

    /// Station the reading was taken at (unused by the board).
    #[serde(rename = "StationID")]
    pub station_id: Option<String>,

    #[serde(rename = "UpdateTime")]
    pub update_time: Option<String>,
}

/// Response from the v3 station list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    #[serde(rename = "Stations", default)]
    pub stations: Vec<StationDto>,
}

/// Minimal station DTO — the table only needs the ID and names.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    #[serde(rename = "StationID")]
    pub station_id: String,

    #[serde(rename = "StationName")]
    pub station_name: Option<NameType>,
}
