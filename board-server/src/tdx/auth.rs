//! TDX access token provider.
//!
//! TDX issues bearer tokens via an OAuth2 client-credentials exchange.
//! Tokens last ~24 hours, so the provider caches the current token and
//! only re-exchanges when less than a safety margin remains. Concurrent
//! callers may race to refresh; last writer wins — refresh is idempotent
//! and cheap relative to request volume, so no single-flight guard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::TdxError;
use super::types::TokenResponse;

/// Default TDX auth realm token endpoint.
const DEFAULT_AUTH_URL: &str =
    "https://tdx.transportdata.tw/auth/realms/TDXConnect/protocol/openid-connect/token";

/// Refresh when less than this much lifetime remains.
const EXPIRY_MARGIN: Duration = Duration::from_secs(600);

/// Lifetime to assume when the provider omits `expires_in`.
const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Configuration for the token provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// TDX client ID
    pub client_id: String,
    /// TDX client secret
    pub client_secret: String,
    /// Token endpoint URL
    pub auth_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AuthConfig {
    /// Create a new config with the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom token endpoint (for testing).
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }
}

/// A cached token with its computed expiry instant.
#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Caching TDX token provider.
#[derive(Clone)]
pub struct TokenProvider {
    http: reqwest::Client,
    config: AuthConfig,
    slot: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenProvider {
    /// Create a new token provider.
    pub fn new(config: AuthConfig) -> Result<Self, TdxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            slot: Arc::new(RwLock::new(None)),
        })
    }

    /// Get a valid bearer token, exchanging credentials if the cached one
    /// is missing or close to expiry.
    pub async fn get_token(&self) -> Result<String, TdxError> {
        {
            let guard = self.slot.read().await;
            if let Some(cached) = guard.as_ref() {
                if still_valid(cached.expires_at, Instant::now()) {
                    debug!("reusing cached TDX token");
                    return Ok(cached.token.clone());
                }
            }
        }

        let token = self.exchange().await?;

        let mut guard = self.slot.write().await;
        *guard = Some(token.clone());

        Ok(token.token)
    }

    /// Perform the client-credentials exchange.
    async fn exchange(&self) -> Result<CachedToken, TdxError> {
        let response = self
            .http
            .post(&self.config.auth_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(TdxError::Auth {
                message: format!("token endpoint returned {}: {}", status.as_u16(), snippet),
            });
        }

        let body = response.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| TdxError::Auth {
                message: format!("malformed token response: {e}"),
            })?;

        let ttl = parsed
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        info!(ttl_secs = ttl.as_secs(), "obtained new TDX token");

        Ok(CachedToken {
            token: parsed.access_token,
            expires_at: Instant::now() + ttl,
        })
    }
}

/// A token is still usable if more than the safety margin remains.
fn still_valid(expires_at: Instant, now: Instant) -> bool {
    expires_at > now + EXPIRY_MARGIN
}
