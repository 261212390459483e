//! Application state for the web layer.

use std::sync::Arc;

use crate::board::BoardService;
use crate::cache::CachedTdxClient;
use crate::stations::StationTable;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Board pipeline over the cached TDX client.
    pub board: Arc<BoardService<CachedTdxClient>>,

    /// Station reference table.
    pub stations: StationTable,

    /// Origin used when the request omits `start`.
    pub default_origin: Arc<str>,

    /// Destination used when the request omits `end`.
    pub default_destination: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        board: BoardService<CachedTdxClient>,
        stations: StationTable,
        default_origin: &str,
        default_destination: &str,
    ) -> Self {
        Self {
            board: Arc::new(board),
            stations,
            default_origin: default_origin.into(),
            default_destination: default_destination.into(),
        }
    }
}
