//! # Error Types
//!
//! Domain-specific error types for vendra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendra-core errors (this file)                                        │
//! │  ├── CoreError        - Draft/business rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vendra-client errors (separate crate)                                 │
//! │  └── ClientError      - Transport / HTTP / envelope failures           │
//! │                                                                         │
//! │  vendra-workflow errors (separate crate)                               │
//! │  └── WorkflowError    - Wraps both, plus storage failures              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WorkflowError → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, quantities, ids)
//! 3. Errors are enum variants, never String
//! 4. Blocking validation errors surface before any network call is made

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent draft rule violations. They are raised before any
/// network call and should be shown to the cashier verbatim.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No customer has been selected for the draft.
    #[error("Please select a customer first")]
    CustomerRequired,

    /// The draft has no line items.
    #[error("Please add items to the invoice")]
    EmptyInvoice,

    /// The bag/box count must be at least 1 before an invoice can be sent.
    #[error("Bag/Box quantity must be at least 1 (got {requested})")]
    BoxQuantityTooLow { requested: i64 },

    /// No user id could be resolved from the session token.
    #[error("User session invalid. Please login again.")]
    MissingUserIdentity,

    /// Optimistic stock pre-check failed.
    ///
    /// The ERP performs the authoritative check at invoice-item creation;
    /// this variant only covers the client-side pre-check.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The selected item has no stock row in the current outlet.
    #[error("No stock found for item {item_id} in outlet {outlet_id}")]
    StockNotFound { item_id: i64, outlet_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-digit characters in a phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "SKU-2231".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for SKU-2231: available 3, requested 5"
        );
    }

    #[test]
    fn test_box_quantity_message_names_value() {
        let err = CoreError::BoxQuantityTooLow { requested: 0 };
        assert!(err.to_string().contains("at least 1"));
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "first_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
