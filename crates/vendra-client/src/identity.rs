//! # Session Token Identity
//!
//! The ERP encodes the current user's identity in the session token's
//! claims. This client never verifies the token (authorization is entirely
//! the ERP's job); it only decodes the claims segment to answer two
//! questions: which numeric user id to stamp on created records, and what
//! name to show as "Billing by".
//!
//! Identity is consumed through the [`IdentityProvider`] trait so the
//! workflow never parses tokens itself.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::http::TokenStore;
use crate::wire::value_as_i64;

/// Shown when no usable identity claim exists.
const FALLBACK_DISPLAY_NAME: &str = "User";

// =============================================================================
// Claims
// =============================================================================

/// The claims this client cares about. Everything is optional; backends
/// differ on which of `sub`/`user_id`/`id` they populate, and the id claim
/// may be a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenClaims {
    /// Decodes the claims segment of a JWT-shaped token without verifying
    /// anything about it.
    pub fn decode(token: &str) -> ClientResult<Self> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or(ClientError::InvalidToken)?;
        // Tokens are base64url; tolerate stray padding.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| ClientError::InvalidToken)?;
        serde_json::from_slice(&bytes).map_err(|_| ClientError::InvalidToken)
    }

    /// Numeric user id, by claim priority: `sub`, then `user_id`, then `id`.
    pub fn resolved_user_id(&self) -> Option<i64> {
        [&self.sub, &self.user_id, &self.id]
            .into_iter()
            .flatten()
            .find_map(value_as_i64)
    }

    /// Display name: `username`, then `name`, then `email`. An email keeps
    /// only the part before the at sign.
    pub fn resolved_display_name(&self) -> String {
        let value = self
            .username
            .clone()
            .or_else(|| self.name.clone())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

        match value.split_once('@') {
            Some((before, _)) => before.to_string(),
            None => value,
        }
    }
}

// =============================================================================
// Identity Provider
// =============================================================================

/// The "current user" capability handed to the workflow.
pub trait IdentityProvider: Send + Sync {
    /// Numeric user id for `created_user_id` / `added_by` stamps.
    fn current_user_id(&self) -> Option<i64>;

    /// Name for the "Billing by" line.
    fn display_name(&self) -> String;
}

/// Identity derived from whatever token the store currently holds.
pub struct TokenIdentity {
    tokens: Arc<dyn TokenStore>,
}

impl TokenIdentity {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        TokenIdentity { tokens }
    }

    fn claims(&self) -> Option<TokenClaims> {
        let token = self.tokens.access_token()?;
        TokenClaims::decode(&token).ok()
    }
}

impl IdentityProvider for TokenIdentity {
    fn current_user_id(&self) -> Option<i64> {
        self.claims()?.resolved_user_id()
    }

    fn display_name(&self) -> String {
        self.claims()
            .map(|c| c.resolved_display_name())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StaticToken;

    /// Builds an unsigned token with the given claims payload.
    fn fake_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_user_id_claim_priority() {
        let claims =
            TokenClaims::decode(&fake_token(&serde_json::json!({"sub": 5, "id": 9}))).unwrap();
        assert_eq!(claims.resolved_user_id(), Some(5));

        let claims =
            TokenClaims::decode(&fake_token(&serde_json::json!({"user_id": "12"}))).unwrap();
        assert_eq!(claims.resolved_user_id(), Some(12));

        let claims = TokenClaims::decode(&fake_token(&serde_json::json!({"id": 3}))).unwrap();
        assert_eq!(claims.resolved_user_id(), Some(3));

        let claims = TokenClaims::decode(&fake_token(&serde_json::json!({}))).unwrap();
        assert_eq!(claims.resolved_user_id(), None);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let claims =
            TokenClaims::decode(&fake_token(&serde_json::json!({"username": "kasun"}))).unwrap();
        assert_eq!(claims.resolved_display_name(), "kasun");

        let claims =
            TokenClaims::decode(&fake_token(&serde_json::json!({"email": "kasun@pos.lk"})))
                .unwrap();
        assert_eq!(claims.resolved_display_name(), "kasun");

        let claims = TokenClaims::decode(&fake_token(&serde_json::json!({}))).unwrap();
        assert_eq!(claims.resolved_display_name(), "User");
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        assert!(TokenClaims::decode("not-a-token").is_err());
        assert!(TokenClaims::decode("a.!!!.c").is_err());
        assert!(TokenClaims::decode("").is_err());
    }

    #[test]
    fn test_token_identity_over_store() {
        let token = fake_token(&serde_json::json!({"sub": 42, "username": "ruwan"}));
        let identity = TokenIdentity::new(Arc::new(StaticToken(Some(token))));
        assert_eq!(identity.current_user_id(), Some(42));
        assert_eq!(identity.display_name(), "ruwan");

        let empty = TokenIdentity::new(Arc::new(StaticToken(None)));
        assert_eq!(empty.current_user_id(), None);
        assert_eq!(empty.display_name(), "User");
    }
}
