use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use board_server::board::{BoardConfig, BoardService};
use board_server::cache::{CacheConfig, CachedTdxClient};
use board_server::stations::StationTable;
use board_server::tdx::{AuthConfig, TdxClient, TdxConfig, TokenProvider};
use board_server::web::{AppState, create_router};

/// How often to refresh the station table (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("board_server=info")),
        )
        .init();

    // Credentials are required; the API rejects anonymous calls.
    let client_id = match std::env::var("TDX_CLIENT_ID") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: TDX_CLIENT_ID not set.");
            std::process::exit(1);
        }
    };
    let client_secret = match std::env::var("TDX_CLIENT_SECRET") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: TDX_CLIENT_SECRET not set.");
            std::process::exit(1);
        }
    };

    let mut auth_config = AuthConfig::new(&client_id, &client_secret);
    if let Ok(url) = std::env::var("TDX_AUTH_URL") {
        auth_config = auth_config.with_auth_url(url);
    }
    let auth = TokenProvider::new(auth_config).expect("Failed to create token provider");

    let mut tdx_config = TdxConfig::new();
    if let Ok(url) = std::env::var("TDX_BASE_URL") {
        tdx_config = tdx_config.with_base_url(url);
    }
    let client = TdxClient::new(tdx_config, auth).expect("Failed to create TDX client");

    let cached = CachedTdxClient::new(client.clone(), CacheConfig::default());
    let board = BoardService::new(cached, BoardConfig::default());

    // Fetch station names (fail fast if unavailable)
    info!("fetching station table...");
    let stations = StationTable::fetch(client)
        .await
        .expect("Failed to fetch station table");
    info!(stations = stations.len().await, "station table loaded");

    // Spawn background task to refresh the station table daily
    let stations_refresh = stations.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match stations_refresh.refresh().await {
                Ok(count) => info!(stations = count, "refreshed station table"),
                Err(e) => error!(%e, "failed to refresh station table"),
            }
        }
    });

    let default_origin =
        std::env::var("BOARD_ORIGIN").unwrap_or_else(|_| "中壢".to_string());
    let default_destination =
        std::env::var("BOARD_DESTINATION").unwrap_or_else(|_| "臺北".to_string());

    let state = AppState::new(board, stations, &default_origin, &default_destination);
    let app = create_router(state, "static");

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    info!(%addr, "TRA departure board listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
