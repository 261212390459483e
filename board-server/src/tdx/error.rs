//! TDX client error types.

/// Errors from the TDX HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TdxError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential exchange failed; no data can be fetched without a token
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Bearer token rejected by a data endpoint
    #[error("unauthorized (token rejected): check TDX_CLIENT_ID and TDX_CLIENT_SECRET")]
    Unauthorized,

    /// Daily quota exhausted
    #[error("rate limited by TDX")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl TdxError {
    /// Build a JSON error carrying a bounded snippet of the offending body.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        let snippet: String = body.chars().take(200).collect();
        TdxError::Json {
            message: format!("{err} (body: {snippet})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TdxError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = TdxError::Auth {
            message: "bad credentials".into(),
        };
        assert!(err.to_string().contains("authentication failed"));

        assert_eq!(TdxError::RateLimited.to_string(), "rate limited by TDX");
    }

    #[test]
    fn json_error_bounds_body_snippet() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let long_body = "x".repeat(10_000);
        let err = TdxError::json(parse_err, &long_body);
        assert!(err.to_string().len() < 400);
    }
}
