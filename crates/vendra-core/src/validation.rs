//! # Validation Module
//!
//! Input validation utilities for Vendra POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Draft state machine (vendra-core)                            │
//! │  ├── Quantity coercion, box-quantity text rules                        │
//! │  └── THIS MODULE: field validators                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Workflow preconditions (vendra-workflow)                     │
//! │  ├── Customer present, items present, identity resolvable              │
//! │  └── Raised BEFORE any network call                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ERP (authoritative)                                          │
//! │  └── Stock availability, numbering, authorization                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Send Preconditions
// =============================================================================

/// Validates the bag/box count at send time.
///
/// ## Rules
/// - Must be at least 1. The draft allows 0 (and empty text) while
///   building; this check only gates the send.
pub fn validate_box_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "bag/box quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name part.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 100 characters
pub fn validate_customer_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a telephone number.
///
/// ## Rules
/// - Empty is allowed (the field is optional)
/// - Otherwise digits, spaces, and the `+ - ( )` characters only
/// - Maximum 20 characters
pub fn validate_telephone(value: &str) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }

    if value.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "telephone".to_string(),
            max: 20,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-' || c == '(' || c == ')')
    {
        return Err(ValidationError::InvalidFormat {
            field: "telephone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a selling price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway lines exist in the field)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates an outlet id.
pub fn validate_outlet_id(id: i64) -> ValidationResult<()> {
    if id < 1 {
        return Err(ValidationError::MustBePositive {
            field: "outlet id".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_box_quantity() {
        assert!(validate_box_quantity(1).is_ok());
        assert!(validate_box_quantity(50).is_ok());
        assert!(validate_box_quantity(0).is_err());
        assert!(validate_box_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("first_name", "Nimal").is_ok());
        assert!(validate_customer_name("first_name", "").is_err());
        assert!(validate_customer_name("first_name", "   ").is_err());
        assert!(validate_customer_name("first_name", &"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_telephone() {
        assert!(validate_telephone("").is_ok());
        assert!(validate_telephone("0771234567").is_ok());
        assert!(validate_telephone("+94 (77) 123-4567").is_ok());
        assert!(validate_telephone("not a phone").is_err());
        assert!(validate_telephone(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  rice  ").unwrap(), "rice");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }
}
