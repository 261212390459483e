//! TRA departure board server.
//!
//! Serves a live origin-to-destination departure board for Taiwan Railway,
//! built from the TDX open-data API: daily timetables are normalized,
//! merged across service-day boundaries and adjusted by the live delay
//! feed, with caching and stale fallback between the two.

pub mod board;
pub mod cache;
pub mod domain;
pub mod stations;
pub mod tdx;
pub mod web;
