//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::services::ServeDir;

use crate::board::{Board, BoardError, BoardRequest};
use crate::domain::time::taipei;
use crate::stations::Station;

use super::dto::*;
use super::state::AppState;
use super::templates::{BoardTemplate, ErrorTemplate};

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(board_page))
        .route("/health", get(health))
        .route("/api/board", get(board_json))
        .route("/api/stations/search", get(search_stations))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve a board parameter to a station, falling back to the default.
async fn resolve_station(
    state: &AppState,
    param: Option<&str>,
    default: &str,
    label: &str,
) -> Result<Station, AppError> {
    let query = match param {
        Some(q) if !q.trim().is_empty() => q,
        Some(_) => {
            return Err(AppError::BadRequest {
                message: format!("empty {label} parameter"),
            });
        }
        None => default,
    };

    state
        .stations
        .resolve(query)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown station: {query}"),
        })
}

/// Assemble the board for a request's parameters.
async fn build_board(
    state: &AppState,
    params: &BoardParams,
) -> Result<(Board, bool), AppError> {
    let origin = resolve_station(state, params.start.as_deref(), &state.default_origin, "start")
        .await?;
    let destination =
        resolve_station(state, params.end.as_deref(), &state.default_destination, "end").await?;
    let include_tomorrow = params.next_day.unwrap_or(false);

    let request = BoardRequest {
        origin,
        destination,
        include_tomorrow,
    };
    let now = Utc::now().with_timezone(&taipei());

    let board = state.board.build(&request, now).await?;
    Ok((board, include_tomorrow))
}

/// Departure board page.
async fn board_page(
    State(state): State<AppState>,
    Query(params): Query<BoardParams>,
) -> Result<Response, AppError> {
    let (board, next_day) = match build_board(&state, &params).await {
        Ok(out) => out,
        Err(err) => return Ok(err.into_page()),
    };

    let html = BoardTemplate::from_board(&board, next_day)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("template error: {e}"),
        })?;

    Ok(Html(html).into_response())
}

/// Departure board as JSON.
async fn board_json(
    State(state): State<AppState>,
    Query(params): Query<BoardParams>,
) -> Result<Json<BoardResponse>, AppError> {
    let (board, _) = build_board(&state, &params).await?;
    Ok(Json(BoardResponse::from_board(&board)))
}

/// Search stations by name or ID.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let matches = state.stations.search(&req.q, limit).await;

    let stations = matches
        .iter()
        .map(StationSearchResult::from_station)
        .collect();

    Json(StationSearchResponse { stations })
}

/// Application-level error, rendered as JSON (or an HTML page for the
/// board page).
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::TodayUnavailable(_) => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &str, &str) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "Bad request", message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "Not found", message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, "Upstream error", message),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", message)
            }
        }
    }

    /// Render as an HTML error page.
    fn into_page(self) -> Response {
        let (status, title, message) = self.parts();
        tracing::error!(%status, message, "request failed");

        let html = ErrorTemplate {
            title: title.to_string(),
            message: message.to_string(),
        }
        .render()
        .unwrap_or_else(|e| format!("Template error: {e}"));

        (status, Html(html)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.parts();
        tracing::error!(%status, message, "request failed");

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}
