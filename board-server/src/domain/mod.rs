//! Core domain types shared across the crate.

mod category;
mod station;
pub mod time;
mod train;

pub use category::{Category, classify};
pub use station::{InvalidStationId, StationId};
pub use train::TrainEntry;
