//! # vendra-core: Pure Business Logic for Vendra POS
//!
//! This crate is the **heart** of Vendra POS. It contains all business logic
//! as pure functions and state machines with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendra POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/terminal (shell)                        │   │
//! │  │      Config ──► Logging ──► Session ──► Workflow wiring         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendra-workflow                              │   │
//! │  │    Session guard, invoice workflow, directory/lookup/history   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendra-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │  Invoice  │  │   rules   │  │   │
//! │  │   │ Item/Stock│  │  Discount │  │   Draft   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                    vendra-client                                │   │
//! │  │       ERP REST client, envelope unwrap, token identity          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Item, Stock, statuses, discounts)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`draft`] - The invoice draft state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`paging`] - Pagination arithmetic for the list views
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every computation is deterministic
//! 2. **No I/O**: Network, file system, and storage access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod paging;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendra_core::Money` instead of
// `use vendra_core::money::Money`

pub use draft::{DraftItem, DraftOutcome, DraftState, InvoiceDraft, RecalledInvoice, Totals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Placeholder shown before any invoice number exists.
///
/// ## Why a literal?
/// The draft header always shows something. Until the ERP issues a number
/// (or a provisional one is generated), that something is this exact
/// string, and the number logic compares against it.
pub const AUTO_INVOICE_NUMBER: &str = "AUTO";

/// Outlet used when none has been configured for the terminal.
///
/// ## Business Reason
/// Single-outlet deployments never configure an outlet id; the ERP seeds
/// outlet 1 as the default store.
pub const DEFAULT_OUTLET_ID: i64 = 1;
