//! # Domain Types
//!
//! Core domain types used throughout Vendra POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Item       │   │     Stock       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name parts     │   │  sku (business) │   │  item_id (FK)   │       │
//! │  │  telephone      │   │  name           │   │  outlet_id      │       │
//! │  │  added_by       │   │  description    │   │  selling_price  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  InvoiceStatus  │   │    Discount     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Active         │   │  Percentage bps │                             │
//! │  │  Pending        │   │  Fixed Money    │                             │
//! │  │  Sent/Cancelled │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All identifiers are the ERP's numeric ids. This client owns no entities;
//! every struct here mirrors what the ERP returns, minus wire noise (the
//! shape-tolerant deserialization lives in vendra-client).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer as known to the ERP.
///
/// Immutable from this application's perspective except through explicit
/// create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier assigned by the ERP.
    pub id: i64,

    pub first_name: String,

    pub middle_name: Option<String>,

    pub last_name: String,

    pub address: Option<String>,

    pub telephone: Option<String>,

    /// Free-text description.
    pub description: Option<String>,

    /// User id of whoever created the record.
    pub added_by: Option<i64>,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Display name: first and last name joined, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry. Read-only from this application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,

    pub sub_category_id: Option<i64>,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    pub name: String,

    pub other_name: Option<String>,

    pub description: Option<String>,

    pub origin: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Stock
// =============================================================================

/// A per-outlet quantity and price for an Item. Read-only.
///
/// The authoritative availability check happens server-side at invoice-item
/// creation; this client only pre-checks optimistically against `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,

    pub item_id: i64,

    pub outlet_id: i64,

    /// Units on hand in this outlet.
    pub quantity: i64,

    /// Selling price per unit.
    pub selling_price: Money,

    /// Outlet display name, when the ERP includes one.
    pub outlet_name: Option<String>,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The status of a persisted invoice.
///
/// ## Status Vocabulary
/// The ERP's vocabulary has drifted across versions:
/// - `SENT` from older backends marks invoices that are still recallable,
///   so it normalizes to `Pending` for recall gating
/// - `CANCELLED` and `CANCELED` both occur; the canonical spelling is
///   `CANCELLED` with `CANCELED` as the single fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Auto-saved draft awaiting completion.
    Active,
    /// Sent to the cashier, awaiting settlement.
    Pending,
    /// Legacy spelling of Pending (older backend versions).
    Sent,
    /// Voided.
    Cancelled,
    /// Anything this client does not recognize.
    Unknown,
}

/// Alternate spelling some backend versions expect for a cancel.
pub const CANCELLED_ALTERNATE_SPELLING: &str = "CANCELED";

impl InvoiceStatus {
    /// Parses a raw status string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ACTIVE" => InvoiceStatus::Active,
            "PENDING" => InvoiceStatus::Pending,
            "SENT" => InvoiceStatus::Sent,
            "CANCELLED" | "CANCELED" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Unknown,
        }
    }

    /// Collapses legacy spellings: `Sent` is treated as `Pending`.
    pub fn normalized(self) -> Self {
        match self {
            InvoiceStatus::Sent => InvoiceStatus::Pending,
            other => other,
        }
    }

    /// Only pending or active records may be recalled into a draft.
    pub fn is_recallable(self) -> bool {
        matches!(
            self.normalized(),
            InvoiceStatus::Pending | InvoiceStatus::Active
        )
    }

    /// Wire representation sent to the ERP.
    pub fn as_wire(self) -> &'static str {
        match self {
            InvoiceStatus::Active => "ACTIVE",
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Cancelled => "CANCELLED",
            InvoiceStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Discount kind as the ERP names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    /// Wire representation the send path uses (uppercase).
    pub fn as_wire(self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Fixed => "FIXED",
        }
    }

    /// Lowercase form. The auto-save path has always sent lowercase and
    /// the backend accepts both; changing either side would be a wire
    /// behavior change.
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    /// Parses a raw discount type, case-insensitively. Unrecognized values
    /// fall back to percentage, the terminal default.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "fixed" => DiscountType::Fixed,
            _ => DiscountType::Percentage,
        }
    }
}

/// A draft-level discount.
///
/// Percentage discounts carry basis points (1000 = 10%); fixed discounts
/// carry an absolute amount. The discount is always computed against the
/// pre-discount subtotal, never compounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    Percentage { bps: u32 },
    Fixed { amount: Money },
}

impl Discount {
    /// No discount, expressed as zero percent (the terminal default).
    pub const fn none() -> Self {
        Discount::Percentage { bps: 0 }
    }

    pub fn kind(&self) -> DiscountType {
        match self {
            Discount::Percentage { .. } => DiscountType::Percentage,
            Discount::Fixed { .. } => DiscountType::Fixed,
        }
    }

    /// The amount this discount takes off the given subtotal.
    ///
    /// A fixed discount larger than the subtotal is NOT clamped; the caller
    /// sees a negative total. That matches the deployed behavior and is
    /// deliberate.
    pub fn amount_against(&self, subtotal: Money) -> Money {
        match *self {
            Discount::Percentage { bps } => subtotal.percentage_of(bps),
            Discount::Fixed { amount } => amount,
        }
    }

    pub fn is_none(&self) -> bool {
        match *self {
            Discount::Percentage { bps } => bps == 0,
            Discount::Fixed { amount } => amount.is_zero(),
        }
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_full_name() {
        let customer = Customer {
            id: 7,
            first_name: "Nimal".into(),
            middle_name: None,
            last_name: "Perera".into(),
            address: None,
            telephone: None,
            description: None,
            added_by: None,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(customer.full_name(), "Nimal Perera");
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(InvoiceStatus::parse("pending"), InvoiceStatus::Pending);
        assert_eq!(InvoiceStatus::parse(" ACTIVE "), InvoiceStatus::Active);
        assert_eq!(InvoiceStatus::parse("canceled"), InvoiceStatus::Cancelled);
        assert_eq!(InvoiceStatus::parse("CANCELLED"), InvoiceStatus::Cancelled);
        assert_eq!(InvoiceStatus::parse("whatever"), InvoiceStatus::Unknown);
    }

    #[test]
    fn test_sent_normalizes_to_pending() {
        assert_eq!(
            InvoiceStatus::Sent.normalized(),
            InvoiceStatus::Pending
        );
        assert_eq!(
            InvoiceStatus::Pending.normalized(),
            InvoiceStatus::Pending
        );
    }

    #[test]
    fn test_recallable_statuses() {
        assert!(InvoiceStatus::Pending.is_recallable());
        assert!(InvoiceStatus::Active.is_recallable());
        assert!(InvoiceStatus::Sent.is_recallable()); // legacy spelling
        assert!(!InvoiceStatus::Cancelled.is_recallable());
        assert!(!InvoiceStatus::Unknown.is_recallable());
    }

    #[test]
    fn test_cancel_spelling_pair() {
        assert_eq!(InvoiceStatus::Cancelled.as_wire(), "CANCELLED");
        assert_eq!(CANCELLED_ALTERNATE_SPELLING, "CANCELED");
    }

    #[test]
    fn test_percentage_discount_against_subtotal() {
        let discount = Discount::Percentage { bps: 1000 }; // 10%
        let subtotal = Money::from_cents(25000);
        assert_eq!(discount.amount_against(subtotal).cents(), 2500);
    }

    #[test]
    fn test_fixed_discount_is_not_clamped() {
        let discount = Discount::Fixed {
            amount: Money::from_cents(5000),
        };
        let subtotal = Money::from_cents(3000);
        // Larger than the subtotal, returned as-is.
        assert_eq!(discount.amount_against(subtotal).cents(), 5000);
    }

    #[test]
    fn test_discount_type_wire_case() {
        assert_eq!(DiscountType::Percentage.as_wire(), "PERCENTAGE");
        assert_eq!(DiscountType::parse("FIXED"), DiscountType::Fixed);
        assert_eq!(DiscountType::parse("garbage"), DiscountType::Percentage);
    }
}
