//! Web layer: routing, request/response DTOs, HTML rendering.

pub mod dto;
mod routes;
mod state;
mod templates;

pub use routes::{AppError, create_router};
pub use state::AppState;
