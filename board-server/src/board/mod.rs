//! Timetable reconciliation engine.
//!
//! Turns raw per-day TDX timetables plus the live delay table into one
//! chronological, deduplicated train list for an origin-destination pair:
//!
//! 1. [`normalize`] converts one day's raw entries into [`TrainEntry`]
//!    records — delay-adjusted, day-boundary corrected, classified.
//! 2. [`reconcile`] merges up to three service days (yesterday for trains
//!    still running past midnight, today, optionally tomorrow), dedupes,
//!    applies the visibility window and sorts.
//! 3. [`BoardService`] orchestrates the fetches through the caching layer
//!    and absorbs per-day failures.
//!
//! [`TrainEntry`]: crate::domain::TrainEntry

mod config;
mod normalize;
mod reconcile;
mod service;

pub use config::BoardConfig;
pub use normalize::{NormalizeOutcome, Skip, SkipCounts, normalize};
pub use reconcile::{include_yesterday, reconcile};
pub use service::{Board, BoardError, BoardRequest, BoardService, TimetableSource};
