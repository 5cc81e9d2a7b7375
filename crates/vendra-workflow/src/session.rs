//! # Session
//!
//! Login bookkeeping and the session guard.
//!
//! ## Guard Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Guard                                    │
//! │                                                                         │
//! │  route entry ──► guard()                                                │
//! │                    │                                                    │
//! │                    ├── ephemeral "is_authenticated" == "true"           │
//! │                    │        └──► Allow                                  │
//! │                    │                                                    │
//! │                    └── anything else                                    │
//! │                             └──► RedirectToLogin                        │
//! │                                                                         │
//! │  Stateless across evaluations, no side effects beyond the decision.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session also implements [`TokenStore`], so the API client reads the
//! bearer token straight from here, and it is the place login outcomes get
//! recorded.

use std::sync::Arc;

use tracing::info;

use vendra_client::{ApiClient, LoginOutcome, TokenStore};
use vendra_core::DEFAULT_OUTLET_ID;

use crate::error::WorkflowResult;
use crate::storage::{keys, KeyStore};

/// What the guard decides for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// The terminal session: a persistent store (token, cached identifiers,
/// offline draft) and an ephemeral store (the guard flag).
#[derive(Clone)]
pub struct Session {
    persistent: Arc<dyn KeyStore>,
    ephemeral: Arc<dyn KeyStore>,
}

impl Session {
    pub fn new(persistent: Arc<dyn KeyStore>, ephemeral: Arc<dyn KeyStore>) -> Self {
        Session {
            persistent,
            ephemeral,
        }
    }

    /// The persistent store, for components that keep their own keys there
    /// (the offline draft blob).
    pub fn persistent(&self) -> Arc<dyn KeyStore> {
        self.persistent.clone()
    }

    // =========================================================================
    // Guard
    // =========================================================================

    /// Whether a protected view may proceed. Re-evaluated on every entry.
    pub fn guard(&self) -> GuardDecision {
        if self.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToLogin
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.ephemeral
            .get(keys::IS_AUTHENTICATED)
            .as_deref()
            == Some("true")
    }

    // =========================================================================
    // Login Lifecycle
    // =========================================================================

    /// Entering the login flow clears any previous session's footprint.
    pub fn begin_login(&self) {
        self.ephemeral.remove(keys::IS_AUTHENTICATED);
        self.persistent.remove(keys::ACCESS_TOKEN);
        self.persistent.remove(keys::LEGACY_TOKEN);
        self.persistent.remove(keys::USER_ID);
    }

    /// Records a successful login.
    pub fn complete_login(&self, outcome: &LoginOutcome) {
        self.persistent.set(keys::ACCESS_TOKEN, &outcome.token);
        self.persistent.set(keys::USERNAME, &outcome.username);
        if let Some(user_id) = outcome.user_id {
            self.persistent.set(keys::USER_ID, &user_id.to_string());
        }
        self.persistent.set(keys::LOGIN_SUCCESS, "true");
        self.ephemeral.set(keys::IS_AUTHENTICATED, "true");
        info!(username = %outcome.username, "login recorded");
    }

    /// Runs the login call and records the outcome. A failed login leaves
    /// the session cleared, exactly as it was after [`begin_login`].
    ///
    /// [`begin_login`]: Session::begin_login
    pub async fn login(
        &self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> WorkflowResult<LoginOutcome> {
        self.begin_login();
        match client.auth().login(username, password).await {
            Ok(outcome) => {
                self.complete_login(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                self.begin_login();
                Err(e.into())
            }
        }
    }

    /// Reads and clears the one-shot "just logged in" flag.
    pub fn take_login_success(&self) -> bool {
        let set = self.persistent.get(keys::LOGIN_SUCCESS).as_deref() == Some("true");
        if set {
            self.persistent.remove(keys::LOGIN_SUCCESS);
        }
        set
    }

    // =========================================================================
    // Cached Identifiers
    // =========================================================================

    /// Username recorded at login, for display.
    pub fn username(&self) -> Option<String> {
        self.persistent.get(keys::USERNAME)
    }

    /// Numeric user id recorded at login. The token claims remain the
    /// authoritative identity; this is the display/bookkeeping fallback.
    pub fn stored_user_id(&self) -> Option<i64> {
        self.persistent.get(keys::USER_ID)?.trim().parse().ok()
    }

    /// Configured outlet id, defaulting when unset or unparsable.
    pub fn outlet_id(&self) -> i64 {
        self.persistent
            .get(keys::OUTLET_ID)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_OUTLET_ID)
    }

    pub fn set_outlet_id(&self, outlet_id: i64) {
        self.persistent.set(keys::OUTLET_ID, &outlet_id.to_string());
    }
}

/// The API client reads the bearer token from the session on every
/// request, primary key first, then the legacy key older installs used.
impl TokenStore for Session {
    fn access_token(&self) -> Option<String> {
        self.persistent
            .get(keys::ACCESS_TOKEN)
            .or_else(|| self.persistent.get(keys::LEGACY_TOKEN))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn test_session() -> Session {
        Session::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn outcome(token: &str, user_id: Option<i64>) -> LoginOutcome {
        LoginOutcome {
            token: token.to_string(),
            user_id,
            username: "kasun".to_string(),
        }
    }

    #[test]
    fn test_guard_redirects_until_login() {
        let session = test_session();
        assert_eq!(session.guard(), GuardDecision::RedirectToLogin);

        session.complete_login(&outcome("tok", Some(4)));
        assert_eq!(session.guard(), GuardDecision::Allow);
    }

    #[test]
    fn test_begin_login_clears_previous_session() {
        let session = test_session();
        session.complete_login(&outcome("tok", Some(4)));
        session.begin_login();

        assert_eq!(session.guard(), GuardDecision::RedirectToLogin);
        assert_eq!(session.access_token(), None);
        assert_eq!(session.stored_user_id(), None);
    }

    #[test]
    fn test_legacy_token_key_is_honored() {
        let session = test_session();
        session.persistent.set(keys::LEGACY_TOKEN, "old-tok");
        assert_eq!(session.access_token().as_deref(), Some("old-tok"));

        // The primary key wins when both exist.
        session.persistent.set(keys::ACCESS_TOKEN, "new-tok");
        assert_eq!(session.access_token().as_deref(), Some("new-tok"));
    }

    #[test]
    fn test_login_success_flag_is_one_shot() {
        let session = test_session();
        session.complete_login(&outcome("tok", None));
        assert!(session.take_login_success());
        assert!(!session.take_login_success());
    }

    #[test]
    fn test_outlet_id_defaults() {
        let session = test_session();
        assert_eq!(session.outlet_id(), DEFAULT_OUTLET_ID);
        session.set_outlet_id(3);
        assert_eq!(session.outlet_id(), 3);
        session.persistent.set(keys::OUTLET_ID, "garbage");
        assert_eq!(session.outlet_id(), DEFAULT_OUTLET_ID);
    }
}
