//! TRA station reference table.
//!
//! Station names and IDs are static reference data, fetched from the TDX
//! station endpoint once at startup and refreshed daily in the background.

mod table;

pub use table::{Station, StationTable};
