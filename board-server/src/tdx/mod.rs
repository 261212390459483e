//! TDX (Transport Data eXchange) client for TRA data.
//!
//! This module provides an HTTP client for the Taiwanese TDX open-data
//! platform, which serves TRA timetables and live delay data.
//!
//! Key characteristics of TDX:
//! - Authentication is OAuth2 client-credentials: a short exchange at the
//!   auth realm yields a bearer token valid for ~24 hours
//! - The v3 origin-destination daily timetable returns only trains serving
//!   a given station pair on a given date, with their full stop lists
//! - The v2 live delay feed is a flat system-wide table of
//!   (train number, delay minutes), refreshed upstream every few tens of
//!   seconds
//! - Responses carry an `x-ratelimit-remaining` header showing the
//!   remaining daily quota

mod auth;
mod client;
mod error;
pub mod mock;
mod types;

pub use auth::{AuthConfig, TokenProvider};
pub use client::{DelayMap, Diagnostics, TdxClient, TdxConfig};
pub use error::TdxError;
pub use types::{
    LiveDelay, NameType, OdTimetableResponse, StationDto, StationsResponse, StopTime,
    TokenResponse, TrainInfo, TrainTimetable,
};
