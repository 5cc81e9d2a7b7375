//! # Authentication
//!
//! The login call. Credentials go in, a bearer token and (when the backend
//! includes one) a numeric user id come out. Response shapes vary between
//! backend versions, so extraction probes the documented nested form and
//! the flat legacy form.

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::wire::value_as_i64;

/// What a successful login yields.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Bearer token for every subsequent request.
    pub token: String,
    /// Numeric user id, when the response carried one. The token claims
    /// remain the authoritative identity source either way.
    pub user_id: Option<i64>,
    /// The username that logged in (echoed back for display bookkeeping).
    pub username: String,
}

/// Auth endpoint wrapper. Obtained via [`ApiClient::auth`].
pub struct AuthApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// `POST /auth/login`. The backend field is `email` even though
    /// operators type a username.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        let body = json!({ "email": username, "password": password });
        let response = self.client.post("/auth/login", &body).await?;
        debug!("login response received");
        parse_login_response(&response, username)
    }
}

/// Pulls the token and user id out of whichever shape the backend used.
///
/// ## Shapes Tolerated
/// - `{ data: { accessToken, user: { id } } }` (documented)
/// - `{ access_token, user_id }` (flat legacy)
/// - `{ token, id }` (oldest)
fn parse_login_response(response: &Value, username: &str) -> ClientResult<LoginOutcome> {
    let api_data = response.get("data").unwrap_or(response);

    let token = api_data
        .get("accessToken")
        .or_else(|| response.get("access_token"))
        .or_else(|| api_data.get("token"))
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| {
            ClientError::UnexpectedShape("login response carried no token".to_string())
        })?;

    let user = api_data.get("user").unwrap_or(api_data);
    let user_id = user
        .get("id")
        .or_else(|| user.get("user_id"))
        .or_else(|| response.get("user_id"))
        .and_then(value_as_i64);

    Ok(LoginOutcome {
        token,
        user_id,
        username: username.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_nested_shape() {
        let response = json!({
            "data": { "accessToken": "tok-1", "user": { "id": 4, "username": "kasun" } }
        });
        let outcome = parse_login_response(&response, "kasun").unwrap();
        assert_eq!(outcome.token, "tok-1");
        assert_eq!(outcome.user_id, Some(4));
        assert_eq!(outcome.username, "kasun");
    }

    #[test]
    fn test_flat_legacy_shape() {
        let response = json!({ "access_token": "tok-2", "user_id": "9" });
        let outcome = parse_login_response(&response, "ruwan").unwrap();
        assert_eq!(outcome.token, "tok-2");
        assert_eq!(outcome.user_id, Some(9));
    }

    #[test]
    fn test_oldest_shape() {
        let response = json!({ "token": "tok-3", "id": 2 });
        let outcome = parse_login_response(&response, "x").unwrap();
        assert_eq!(outcome.token, "tok-3");
        assert_eq!(outcome.user_id, Some(2));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let response = json!({ "data": { "user": { "id": 4 } } });
        assert!(matches!(
            parse_login_response(&response, "x"),
            Err(ClientError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_missing_user_id_is_tolerated() {
        let response = json!({ "data": { "accessToken": "tok" } });
        let outcome = parse_login_response(&response, "x").unwrap();
        assert_eq!(outcome.user_id, None);
    }
}
