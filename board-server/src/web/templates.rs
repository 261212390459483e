//! Askama templates for the web frontend.

use askama::Template;

use crate::board::Board;
use crate::domain::TrainEntry;
use crate::domain::time::{fmt_hm, fmt_hms};

/// The departure board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub start: String,
    pub end: String,
    pub update_time: String,
    pub delay_failed: bool,
    pub next_day: bool,
    pub route_status: String,
    pub delay_status: String,
    pub trains: Vec<TrainCard>,
}

impl BoardTemplate {
    pub fn from_board(board: &Board, next_day: bool) -> Self {
        let mut route_status = board.diagnostics.route_status.clone();
        if board.route_degraded {
            route_status.push_str(" (stale)");
        }

        Self {
            start: board.origin.display_name().to_string(),
            end: board.destination.display_name().to_string(),
            update_time: fmt_hms(&board.generated_at),
            delay_failed: board.delay_failed,
            next_day,
            route_status,
            delay_status: board.diagnostics.delay_status.clone(),
            trains: board.trains.iter().map(TrainCard::from_entry).collect(),
        }
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

/// One train card on the board page.
#[derive(Debug, Clone)]
pub struct TrainCard {
    pub no: String,
    pub kind: String,
    pub color: String,
    pub delay: i64,
    pub sch_dep: String,
    pub sch_arr: String,
    pub act_dep: String,
    pub act_arr: String,
    pub is_past: bool,
    /// Link to the official TRA timetable page for this train.
    pub url: String,
}

impl TrainCard {
    pub fn from_entry(entry: &TrainEntry) -> Self {
        let ride_date = entry.sch_dep.format("%Y/%m/%d");
        let url = format!(
            "https://www.railway.gov.tw/tra-tip-web/tip/tip001/tip112/querybytrainno?trainNo={}&rideDate={}",
            entry.no, ride_date
        );

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
            url,
        }
    }
}
