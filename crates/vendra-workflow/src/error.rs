//! # Workflow Error Type
//!
//! The error the orchestration layer returns to its callers: either a
//! blocking validation failure from the core (raised before any network
//! call) or a client failure from the wire. Both carry user-presentable
//! messages.

use thiserror::Error;

use vendra_client::ClientError;
use vendra_core::CoreError;

/// Result type alias for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Blocking validation failure; no network call was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// ERP communication failure.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl WorkflowError {
    /// Whether this error was raised before any request went out.
    pub fn is_blocking_validation(&self) -> bool {
        matches!(self, WorkflowError::Core(_))
    }
}
