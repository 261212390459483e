//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::domain::TrainEntry;
use crate::domain::time::{fmt_hm, fmt_hms};
use crate::stations::Station;

/// Query parameters for the board endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct BoardParams {
    /// Origin station (ID or name); defaults to the configured origin.
    pub start: Option<String>,

    /// Destination station (ID or name); defaults to the configured
    /// destination.
    pub end: Option<String>,

    /// Extend the look-ahead window to include tomorrow's timetable.
    pub next_day: Option<bool>,
}

/// One train in the JSON board.
#[derive(Debug, Serialize)]
pub struct TrainDto {
    /// Train number.
    pub no: String,

    /// Display category label.
    #[serde(rename = "type")]
    pub kind: String,

    /// Category accent color (hex).
    pub color: String,

    /// Delay applied, in minutes.
    pub delay: i64,

    /// Scheduled departure, "HH:MM".
    pub sch_dep: String,

    /// Scheduled arrival, "HH:MM".
    pub sch_arr: String,

    /// Delay-adjusted departure, "HH:MM".
    pub act_dep: String,

    /// Delay-adjusted arrival, "HH:MM".
    pub act_arr: String,

    /// Departed more than the grace window ago.
    pub is_past: bool,
}

impl TrainDto {
    pub fn from_entry(entry: &TrainEntry) -> Self {
        Self {
            no: entry.no.clone(),
            kind: entry.category.label().to_string(),
            color: entry.category.color().to_string(),
            delay: entry.delay_mins,
            sch_dep: fmt_hm(&entry.sch_dep),
            sch_arr: fmt_hm(&entry.sch_arr),
            act_dep: fmt_hm(&entry.act_dep),
            act_arr: fmt_hm(&entry.act_arr),
            is_past: entry.is_past,
        }
    }
}

/// Upstream status strings, informational only.
#[derive(Debug, Serialize)]
pub struct DiagnosticsDto {
    pub route_status: String,
    pub delay_status: String,
}

/// The JSON board response.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// When the board was generated, "HH:MM:SS" local.
    pub update_time: String,

    /// Origin display name.
    pub start: String,

    /// Destination display name.
    pub end: String,

    /// Live delay data could not be freshly obtained.
    pub delay_failed: bool,

    pub trains: Vec<TrainDto>,

    pub diagnostics: DiagnosticsDto,
}

impl BoardResponse {
    pub fn from_board(board: &Board) -> Self {
        let mut route_status = board.diagnostics.route_status.clone();
        if board.route_degraded {
            route_status.push_str(" (stale)");
        }

        Self {
            update_time: fmt_hms(&board.generated_at),
            start: board.origin.display_name().to_string(),
            end: board.destination.display_name().to_string(),
            delay_failed: board.delay_failed,
            trains: board.trains.iter().map(TrainDto::from_entry).collect(),
            diagnostics: DiagnosticsDto {
                route_status,
                delay_status: board.diagnostics.delay_status.clone(),
            },
        }
    }
}

/// Request for the station lookup endpoint.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    pub q: String,
    pub limit: Option<usize>,
}

/// One station in lookup results.
#[derive(Debug, Serialize)]
pub struct StationSearchResult {
    pub id: String,
    pub name_zh: String,
    pub name_en: String,
}

impl StationSearchResult {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            name_zh: station.name_zh.clone(),
            name_en: station.name_en.clone(),
        }
    }
}

/// Response for the station lookup endpoint.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationSearchResult>,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, SkipCounts};
    use crate::domain::time::{on_service_date, parse_time_of_day};
    use crate::domain::{Category, StationId};
    use crate::tdx::Diagnostics;
    use chrono::NaiveDate;

    fn at(hm: &str) -> chrono::DateTime<chrono::FixedOffset> {
        on_service_date(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            parse_time_of_day(hm).unwrap(),
            false,
        )
        .unwrap()
    }

    fn sample_board() -> Board {
        let station = |id: &str, zh: &str| Station {
            id: StationId::parse(id).unwrap(),
            name_zh: zh.to_string(),
            name_en: String::new(),
        };

        Board {
            generated_at: at("08:00"),
            origin: station("1100", "桃園"),
            destination: station("1000", "臺北"),
            delay_failed: false,
            route_degraded: false,
            trains: vec![TrainEntry {
                no: "123".to_string(),
                category: Category::TzeChiang,
                sch_dep: at("08:05"),
                sch_arr: at("08:40"),
                delay_mins: 3,
                act_dep: at("08:08"),
                act_arr: at("08:43"),
                is_past: false,
            }],
            skipped: SkipCounts::default(),
            diagnostics: Diagnostics {
                route_status: "API 200 (remaining 48)".to_string(),
                delay_status: "API 200".to_string(),
            },
        }
    }

    #[test]
    fn board_response_shape() {
        let response = BoardResponse::from_board(&sample_board());

        assert_eq!(response.update_time, "08:00:00");
        assert_eq!(response.start, "桃園");
        assert_eq!(response.end, "臺北");
        assert!(!response.delay_failed);
        assert_eq!(response.diagnostics.route_status, "API 200 (remaining 48)");

        let train = &response.trains[0];
        assert_eq!(train.no, "123");
        assert_eq!(train.kind, "自強");
        assert_eq!(train.delay, 3);
        assert_eq!(train.sch_dep, "08:05");
        assert_eq!(train.act_dep, "08:08");
        assert!(!train.is_past);
    }

    #[test]
    fn train_serializes_with_type_key() {
        let response = BoardResponse::from_board(&sample_board());
        let json = serde_json::to_value(&response.trains[0]).unwrap();
        assert_eq!(json["type"], "自強");
        assert_eq!(json["act_dep"], "08:08");
    }

    #[test]
    fn stale_route_annotated() {
        let mut board = sample_board();
        board.route_degraded = true;

        let response = BoardResponse::from_board(&board);
        assert_eq!(
            response.diagnostics.route_status,
            "API 200 (remaining 48) (stale)"
        );
    }
}
