//! # HTTP Client
//!
//! The single HTTP client every other component calls through.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ApiClient Request Flow                            │
//! │                                                                         │
//! │  caller ──► get/post/patch(path)                                       │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  resolve_base_url (once, at construction)                              │
//! │    "https://erp.example.com///" → "https://erp.example.com/api"        │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  TokenStore.access_token() ──► Authorization: Bearer <token>           │
//! │    (read per request; absent token sends no header)                    │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  send ──► status check ──► JSON body                                   │
//! │              │                                                          │
//! │              └── non-2xx: extract "message" from the body,             │
//! │                  return ClientError::Status (NO retry)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Fixed path segment every ERP route lives under.
const API_PATH_SEGMENT: &str = "/api";

/// Default request timeout when the shell does not configure one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// Token Source
// =============================================================================

/// Where the bearer token comes from.
///
/// The client reads the token on every request, so a login that lands
/// mid-session is picked up without rebuilding the client.
pub trait TokenStore: Send + Sync {
    /// The current access token, if any.
    fn access_token(&self) -> Option<String>;
}

/// A fixed token (or none), mostly for tests and one-shot tools.
pub struct StaticToken(pub Option<String>);

impl TokenStore for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

// =============================================================================
// Base URL Resolution
// =============================================================================

/// Normalizes a configured base URL.
///
/// Trims surrounding whitespace and trailing slashes, then appends the
/// fixed `/api` segment unless it is already present. An empty value is a
/// configuration error, not a fallback.
pub fn resolve_base_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidBaseUrl(
            "base URL is empty".to_string(),
        ));
    }

    // Reject values reqwest would choke on later, at construction time.
    url::Url::parse(trimmed)?;

    if trimmed.ends_with(API_PATH_SEGMENT) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, API_PATH_SEGMENT))
    }
}

// =============================================================================
// Api Client
// =============================================================================

/// The shared ERP client. Cheap to clone; the inner reqwest client pools
/// connections.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Builds a client against `base_url` with the given token source.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Builds a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = resolve_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ApiClient {
            http,
            base_url,
            tokens,
        })
    }

    /// The resolved base URL (with the `/api` segment).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        debug!(path, "GET");
        let request = self
            .authorize(self.http.get(self.endpoint(path)))
            .query(query);
        Self::execute(request).await
    }

    /// POST with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        debug!(path, "POST");
        let request = self.authorize(self.http.post(self.endpoint(path))).json(body);
        Self::execute(request).await
    }

    /// PATCH with a JSON body.
    pub async fn patch(&self, path: &str, body: &Value) -> ClientResult<Value> {
        debug!(path, "PATCH");
        let request = self
            .authorize(self.http.patch(self.endpoint(path)))
            .json(body);
        Self::execute(request).await
    }

    async fn execute(request: reqwest::RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls a human-readable message out of an error body, when the body is
/// JSON with a `message` (or `error`) field. Anything else yields None and
/// the caller falls back to a generic reason.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_trims_trailing_slashes() {
        assert_eq!(
            resolve_base_url("https://erp.example.com///").unwrap(),
            "https://erp.example.com/api"
        );
    }

    #[test]
    fn test_resolve_appends_api_segment_once() {
        assert_eq!(
            resolve_base_url("https://erp.example.com").unwrap(),
            "https://erp.example.com/api"
        );
        assert_eq!(
            resolve_base_url("https://erp.example.com/api").unwrap(),
            "https://erp.example.com/api"
        );
        assert_eq!(
            resolve_base_url("https://erp.example.com/api/").unwrap(),
            "https://erp.example.com/api"
        );
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(
            resolve_base_url("  https://erp.example.com  ").unwrap(),
            "https://erp.example.com/api"
        );
    }

    #[test]
    fn test_resolve_rejects_empty_and_garbage() {
        assert!(matches!(
            resolve_base_url(""),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            resolve_base_url("   "),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(resolve_base_url("not a url").is_err());
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message":"customer_id is required"}"#),
            Some("customer_id is required".to_string())
        );
        assert_eq!(
            extract_error_message(r#"{"error":"nope"}"#),
            Some("nope".to_string())
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"message":42}"#), None);
    }

    #[test]
    fn test_client_construction_resolves_base() {
        let client = ApiClient::new(
            "https://erp.example.com/",
            Arc::new(StaticToken(None)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://erp.example.com/api");
    }
}
