//! # Vendra POS Terminal Shell
//!
//! Wires the workspace together and runs a headless smoke flow against the
//! configured ERP.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Terminal Startup                                  │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     tracing-subscriber with env filter, default INFO                    │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     terminal.toml + VENDRA_* env overrides                              │
//! │                                                                         │
//! │  3. Open Session Stores ──────────────────────────────────────────────► │
//! │     persistent JSON file + ephemeral memory store                       │
//! │                                                                         │
//! │  4. Build API Client ─────────────────────────────────────────────────► │
//! │     base URL resolution, bearer injection from the session              │
//! │                                                                         │
//! │  5. Login (when credentials provided) ────────────────────────────────► │
//! │     VENDRA_USERNAME / VENDRA_PASSWORD                                   │
//! │                                                                         │
//! │  6. Smoke Listings ───────────────────────────────────────────────────► │
//! │     stock overview + previous invoices row counts                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vendra_client::{ApiClient, IdentityProvider, TokenIdentity, TokenStore};
use vendra_workflow::{
    FileStore, GuardDecision, MemoryStore, OfflineDraft, PreviousInvoices, Session,
    StockOverview,
};

use crate::config::TerminalConfig;

#[tokio::main]
async fn main() {
    init_tracing();

    info!("Starting Vendra POS terminal");

    let config = TerminalConfig::load_or_default(None);
    info!(
        terminal = %config.terminal.name,
        outlet = config.outlet.id,
        "Configuration loaded"
    );

    if config.api.base_url.trim().is_empty() {
        error!("No ERP base URL configured. Set api.base_url in terminal.toml or VENDRA_API_URL.");
        std::process::exit(1);
    }

    // Session stores: one JSON file for the persistent half, memory for
    // the per-process guard flag.
    let persistent = Arc::new(FileStore::open_default());
    let ephemeral = Arc::new(MemoryStore::new());
    let session = Session::new(persistent, ephemeral);
    session.set_outlet_id(config.outlet.id);

    let tokens: Arc<dyn TokenStore> = Arc::new(session.clone());
    let client = match ApiClient::with_timeout(
        &config.api.base_url,
        tokens.clone(),
        Duration::from_secs(config.api.timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Could not build the ERP client");
            std::process::exit(1);
        }
    };
    info!(base_url = %client.base_url(), "ERP client ready");

    // Credentials are optional; without them the shell runs whatever the
    // stored token still allows.
    if let (Ok(username), Ok(password)) = (
        std::env::var("VENDRA_USERNAME"),
        std::env::var("VENDRA_PASSWORD"),
    ) {
        match session.login(&client, &username, &password).await {
            Ok(outcome) => info!(
                username = %outcome.username,
                user_id = ?outcome.user_id,
                "Logged in"
            ),
            Err(e) => {
                error!(error = %e, "Login failed");
                std::process::exit(1);
            }
        }
    }

    if session.guard() == GuardDecision::RedirectToLogin {
        warn!("No authenticated session. Set VENDRA_USERNAME and VENDRA_PASSWORD to log in.");
        return;
    }

    let identity = TokenIdentity::new(tokens);
    info!(billing_by = %identity.display_name(), "Session identity resolved");

    if let Some(stash) = OfflineDraft::load(session.persistent().as_ref()) {
        warn!(
            items = stash.items.len(),
            reason = %stash.reason,
            saved_at = %stash.saved_at,
            "An offline draft from a previous session is waiting"
        );
    }

    // Smoke listings: prove the read paths end to end.
    let mut stock = StockOverview::new(client.clone());
    stock.load_all().await;
    info!(
        rows = stock.filtered().len(),
        pages = stock.total_pages(),
        "Stock overview loaded"
    );

    let mut history = PreviousInvoices::new(client.clone());
    history.load().await;
    info!(
        rows = history.filtered().len(),
        pages = history.total_pages(),
        "Invoice history loaded"
    );

    info!("Terminal smoke flow complete");
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vendra=trace` - Show trace for vendra crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vendra=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
