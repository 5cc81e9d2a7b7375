//! # Terminal Configuration
//!
//! Configuration for one POS terminal instance.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VENDRA_API_URL=https://erp.example.com                             │
//! │     VENDRA_OUTLET_ID=2                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/vendra-pos/terminal.toml (Linux)                         │
//! │     ~/Library/Application Support/com.vendra.pos/terminal.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     auto-generated terminal id, outlet 1                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://erp.example.com"
//! timeout_secs = 20
//!
//! [terminal]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "POS Terminal"
//!
//! [outlet]
//! id = 1
//! name = "Main Street"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vendra_client::http::DEFAULT_TIMEOUT_SECS;
use vendra_core::DEFAULT_OUTLET_ID;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("api.base_url must start with http:// or https://, got: {0}")]
    InvalidBaseUrl(String),

    #[error("outlet.id must be at least 1")]
    InvalidOutletId,

    #[error("terminal.id must not be empty")]
    MissingTerminalId,
}

// =============================================================================
// Sections
// =============================================================================

/// ERP endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the ERP. The `/api` segment is appended by the client
    /// when absent.
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// This terminal's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Unique terminal identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    pub id: String,

    /// Human-readable terminal name.
    #[serde(default = "default_terminal_name")]
    pub name: String,
}

fn default_terminal_name() -> String {
    "POS Terminal".to_string()
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            id: Uuid::new_v4().to_string(),
            name: default_terminal_name(),
        }
    }
}

/// The outlet this terminal sells from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutletSettings {
    #[serde(default = "default_outlet_id")]
    pub id: i64,

    #[serde(default)]
    pub name: String,
}

fn default_outlet_id() -> i64 {
    DEFAULT_OUTLET_ID
}

impl Default for OutletSettings {
    fn default() -> Self {
        OutletSettings {
            id: default_outlet_id(),
            name: String::new(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub terminal: TerminalSettings,

    #[serde(default)]
    pub outlet: OutletSettings,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)
                    .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Terminal config saved");
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// An empty base URL passes here (the shell reports it cleanly at
    /// startup); a non-empty one must be http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terminal.id.trim().is_empty() {
            return Err(ConfigError::MissingTerminalId);
        }

        let base = self.api.base_url.trim();
        if !base.is_empty() && !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base.to_string()));
        }

        if self.outlet.id < 1 {
            return Err(ConfigError::InvalidOutletId);
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VENDRA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("VENDRA_API_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.api.timeout_secs = secs;
            }
        }

        if let Ok(name) = std::env::var("VENDRA_TERMINAL_NAME") {
            self.terminal.name = name;
        }

        if let Ok(outlet) = std::env::var("VENDRA_OUTLET_ID") {
            if let Ok(id) = outlet.parse::<i64>() {
                debug!(outlet_id = id, "Overriding outlet id from environment");
                self.outlet.id = id;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vendra", "pos")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
