//! # Invoice Draft
//!
//! The in-memory state machine for building an invoice.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Draft Lifecycle                                    │
//! │                                                                         │
//! │            select_customer / add_item / set_*                          │
//! │                 ┌────────────┐                                          │
//! │                 ▼            │                                          │
//! │   new() ──► Building ────────┘                                          │
//! │                 │                                                       │
//! │                 ├── send succeeds ──────────► Finalized(Sent)           │
//! │                 │    (items cleared, confirmed number kept)             │
//! │                 │                                                       │
//! │                 ├── cancel ─────────────────► Finalized(Cancelled)      │
//! │                 │    (everything cleared, unconditionally)              │
//! │                 │                                                       │
//! │                 └── auto-save on teardown ──► Finalized(Recovered)      │
//! │                      (items kept in memory, save happens once)          │
//! │                                                                         │
//! │   recall() overwrites the whole draft while staying in Building.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Line items are unique by item identity (adding the same item again
//!   increases its quantity)
//! - Line quantity is always >= 1; unparsable edits coerce to 1
//! - The box quantity may be 0 or empty while building; it is validated
//!   against >= 1 only at send time
//! - The finalized marker and the last draft record id are fields of this
//!   struct and change only through its methods
//!
//! This module performs no I/O. The network half of send/cancel/recall/
//! auto-save lives in vendra-workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Customer, Discount};
use crate::AUTO_INVOICE_NUMBER;

// =============================================================================
// Line Items
// =============================================================================

/// A draft line item, one per selected product.
///
/// ## Price Freezing
/// The unit price is captured when the product is added. Later price
/// changes in the ERP do not affect lines already in the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    /// Stock row id (what the ERP wants on invoice-item creation).
    pub stock_id: i64,

    /// Catalog item id. Merge identity for repeated adds.
    pub item_id: i64,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Item description at time of adding (frozen).
    pub description: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity, always >= 1.
    pub quantity: i64,
}

impl DraftItem {
    /// Line total (unit price x quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Result of a totals computation. Pure function of the item list and the
/// discount; recomputed on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    /// Number of distinct lines (not summed quantity).
    pub item_count: usize,
}

// =============================================================================
// Lifecycle State
// =============================================================================

/// How a finalized draft ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftOutcome {
    /// Sent to the cashier.
    Sent,
    /// Cancelled (backing record transitioned, local state cleared).
    Cancelled,
    /// Auto-saved as a recovery draft on navigation-away.
    Recovered,
}

/// Draft lifecycle state. Once finalized, the auto-save path becomes a
/// no-op for the rest of this draft's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Building,
    Finalized(DraftOutcome),
}

// =============================================================================
// Recall Input
// =============================================================================

/// Everything a recalled invoice contributes to the draft, already remapped
/// from the persisted shape by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalledInvoice {
    pub id: i64,
    pub invoice_no: Option<String>,
    pub customer: Option<Customer>,
    pub items: Vec<DraftItem>,
    pub paid_amount: Money,
    pub discount: Discount,
    pub box_quantity: i64,
}

// =============================================================================
// Quantity Parsing
// =============================================================================

/// Parses a leading integer out of free text, the way lenient numeric
/// inputs behave: optional sign, then as many digits as are present.
/// `"7abc"` parses as 7, `"abc"` parses as nothing.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses a line-item quantity edit. Anything that is not a positive
/// integer coerces to 1; zero and negative quantities are never produced.
pub fn parse_line_quantity(raw: &str) -> i64 {
    match parse_leading_int(raw) {
        Some(v) if v > 0 => v,
        _ => 1,
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The invoice being assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Selected customer, if any.
    pub customer: Option<Customer>,

    /// Ordered line items.
    pub items: Vec<DraftItem>,

    /// Bag/box count as raw text. Kept as text because the input allows an
    /// empty intermediate state; parsed on demand via [`box_quantity`].
    ///
    /// [`box_quantity`]: InvoiceDraft::box_quantity
    pub box_quantity_text: String,

    /// Draft-level discount.
    pub discount: Discount,

    /// Amount already paid, when recalling a partially settled invoice.
    pub paid_amount: Money,

    /// Link to the recalled source invoice, for audit.
    pub previous_invoice_id: Option<i64>,

    /// Assigned or provisional invoice number, or the AUTO placeholder.
    invoice_number: String,

    /// Number confirmed by the ERP on the last successful send, retained
    /// for display after the form clears.
    last_confirmed_number: Option<String>,

    /// Index awaiting removal confirmation, if any.
    pending_removal: Option<usize>,

    /// Lifecycle state. See [`DraftState`].
    state: DraftState,

    /// Id of the most recent auto-saved backing record, used by cancel.
    last_draft_record_id: Option<i64>,
}

impl InvoiceDraft {
    /// Creates an empty draft in the Building state.
    pub fn new() -> Self {
        InvoiceDraft {
            customer: None,
            items: Vec::new(),
            box_quantity_text: "0".to_string(),
            discount: Discount::none(),
            paid_amount: Money::zero(),
            previous_invoice_id: None,
            invoice_number: AUTO_INVOICE_NUMBER.to_string(),
            last_confirmed_number: None,
            pending_removal: None,
            state: DraftState::Building,
            last_draft_record_id: None,
        }
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// Sets the draft customer.
    ///
    /// Starting a brand-new invoice after a send must not keep showing the
    /// previous confirmed invoice number, so the stale confirmation display
    /// is cleared first (unless a recall is in progress).
    pub fn select_customer(&mut self, customer: Customer) {
        self.clear_stale_confirmation();
        self.customer = Some(customer);
    }

    /// Clears the confirmed-number display when a new invoice is being
    /// started and no recall is in progress. Also resets the number to the
    /// AUTO placeholder and the box quantity to zero.
    pub fn clear_stale_confirmation(&mut self) {
        if self.last_confirmed_number.is_some() && self.previous_invoice_id.is_none() {
            self.last_confirmed_number = None;
            self.invoice_number = AUTO_INVOICE_NUMBER.to_string();
            self.box_quantity_text = "0".to_string();
        }
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Adds a line item, merging by item identity.
    ///
    /// ## Behavior
    /// - Item already in the draft: quantities are summed
    /// - Otherwise: appended at the end
    ///
    /// There is no client-side upper bound; the ERP validates stock at
    /// invoice-item creation and the caller pre-checks optimistically.
    pub fn add_item(&mut self, line: DraftItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.item_id == line.item_id) {
            existing.quantity += line.quantity;
            return;
        }
        self.items.push(line);
    }

    /// Applies a quantity edit to the line at `index`.
    ///
    /// Unparsable or non-positive input coerces to 1. Out-of-range indexes
    /// are ignored (the row no longer exists).
    pub fn set_item_quantity(&mut self, index: usize, raw: &str) {
        if let Some(item) = self.items.get_mut(index) {
            item.quantity = parse_line_quantity(raw);
        }
    }

    /// First step of removal: remember which row the cashier asked to
    /// remove, pending confirmation.
    pub fn request_remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.pending_removal = Some(index);
        }
    }

    /// The row awaiting removal confirmation, if any.
    pub fn pending_removal(&self) -> Option<&DraftItem> {
        self.pending_removal.and_then(|i| self.items.get(i))
    }

    /// Second step of removal: actually remove the pending row. Order of
    /// the remaining items is preserved.
    pub fn confirm_remove_item(&mut self) -> Option<DraftItem> {
        let index = self.pending_removal.take()?;
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Abandons a pending removal.
    pub fn cancel_remove_item(&mut self) {
        self.pending_removal = None;
    }

    // =========================================================================
    // Box Quantity
    // =========================================================================

    /// Applies a box-quantity edit. Only empty text or digits are accepted;
    /// anything else leaves the field unchanged.
    pub fn set_box_quantity_text(&mut self, raw: &str) {
        if raw.is_empty() || raw.chars().all(|c| c.is_ascii_digit()) {
            self.box_quantity_text = raw.to_string();
        }
    }

    /// Parsed box quantity; empty or unparsable text counts as 0.
    pub fn box_quantity(&self) -> i64 {
        parse_leading_int(&self.box_quantity_text).unwrap_or(0)
    }

    pub fn increment_box_quantity(&mut self) {
        self.box_quantity_text = (self.box_quantity() + 1).to_string();
    }

    /// Decrement floors at 0; the >= 1 rule applies only at send time.
    pub fn decrement_box_quantity(&mut self) {
        let current = self.box_quantity();
        if current > 0 {
            self.box_quantity_text = (current - 1).to_string();
        }
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Computes subtotal, discount, and total.
    ///
    /// Pure and idempotent: unchanged inputs yield identical output.
    /// `total = subtotal - discount` always; an over-subtotal fixed
    /// discount yields a negative total, which is not clamped.
    pub fn totals(&self) -> Totals {
        let subtotal = self
            .items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.line_total());
        let discount = self.discount.amount_against(subtotal);
        Totals {
            subtotal,
            discount,
            total: subtotal - discount,
            item_count: self.items.len(),
        }
    }

    // =========================================================================
    // Invoice Number Display
    // =========================================================================

    /// Re-evaluates the provisional invoice number.
    ///
    /// Once a customer and at least one item are present (and nothing has
    /// been confirmed yet), a display-only provisional number of the form
    /// `INV-<last 4 digits of unix-seconds>` is assigned. If the draft
    /// drops back below that threshold the number reverts to AUTO. The
    /// provisional number is discarded on send in favor of the ERP-issued
    /// number.
    pub fn refresh_invoice_number(&mut self, now: DateTime<Utc>) {
        let populated = self.customer.is_some() && !self.items.is_empty();
        if self.last_confirmed_number.is_none()
            && populated
            && self.invoice_number == AUTO_INVOICE_NUMBER
        {
            let seconds = now.timestamp().to_string();
            let tail_start = seconds.len().saturating_sub(4);
            self.invoice_number = format!("INV-{}", &seconds[tail_start..]);
        } else if self.last_confirmed_number.is_none()
            && !populated
            && self.invoice_number != AUTO_INVOICE_NUMBER
        {
            self.invoice_number = AUTO_INVOICE_NUMBER.to_string();
        }
    }

    /// The number shown on the draft header.
    ///
    /// Priority: confirmed number from this session (as `PENDING: <no>`),
    /// then an assigned non-placeholder number, then the AUTO placeholder.
    pub fn display_invoice_number(&self) -> String {
        if let Some(no) = &self.last_confirmed_number {
            return format!("PENDING: {}", no);
        }
        if self.invoice_number != AUTO_INVOICE_NUMBER {
            return self.invoice_number.clone();
        }
        AUTO_INVOICE_NUMBER.to_string()
    }

    /// The currently assigned invoice number (placeholder included).
    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    /// The number confirmed by the last successful send, if any.
    pub fn last_confirmed_number(&self) -> Option<&str> {
        self.last_confirmed_number.as_deref()
    }

    // =========================================================================
    // Recall
    // =========================================================================

    /// Replaces the entire draft with the recalled invoice's contents and
    /// links the draft to the source record for audit.
    pub fn recall(&mut self, source: RecalledInvoice) {
        self.invoice_number = source
            .invoice_no
            .unwrap_or_else(|| format!("INV-{}", source.id));
        self.previous_invoice_id = Some(source.id);
        // Clear the confirmed display so the recalled number shows.
        self.last_confirmed_number = None;
        self.customer = source.customer;
        self.items = source.items;
        self.paid_amount = source.paid_amount;
        self.discount = source.discount;
        self.box_quantity_text = source.box_quantity.to_string();
        self.pending_removal = None;
    }

    // =========================================================================
    // Lifecycle Transitions
    // =========================================================================

    /// Current lifecycle state.
    pub fn state(&self) -> DraftState {
        self.state
    }

    /// Whether this draft has finalized (sent, cancelled, or recovered).
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, DraftState::Finalized(_))
    }

    /// Id of the most recent auto-saved backing record.
    pub fn last_draft_record_id(&self) -> Option<i64> {
        self.last_draft_record_id
    }

    /// Records the backing record created by an auto-save, so a later
    /// cancel can void it.
    pub fn record_draft_save(&mut self, record_id: i64) {
        self.last_draft_record_id = Some(record_id);
    }

    /// Marks the draft finalized by a recovery save.
    pub fn mark_recovered(&mut self) {
        self.state = DraftState::Finalized(DraftOutcome::Recovered);
    }

    /// Clears the form after a successful send, keeping the confirmed
    /// invoice number on display.
    pub fn clear_after_send(&mut self, confirmed_number: String) {
        self.invoice_number = confirmed_number.clone();
        self.last_confirmed_number = Some(confirmed_number);
        self.items.clear();
        self.customer = None;
        self.box_quantity_text = "0".to_string();
        self.discount = Discount::none();
        self.paid_amount = Money::zero();
        self.previous_invoice_id = None;
        self.pending_removal = None;
        self.state = DraftState::Finalized(DraftOutcome::Sent);
    }

    /// Clears everything after a cancel, invoice number included. Runs
    /// regardless of whether the remote cancel succeeded.
    pub fn clear_after_cancel(&mut self) {
        self.items.clear();
        self.customer = None;
        self.box_quantity_text = "0".to_string();
        self.discount = Discount::none();
        self.paid_amount = Money::zero();
        self.previous_invoice_id = None;
        self.invoice_number = AUTO_INVOICE_NUMBER.to_string();
        self.last_confirmed_number = None;
        self.pending_removal = None;
        self.state = DraftState::Finalized(DraftOutcome::Cancelled);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_customer(&self) -> bool {
        self.customer.is_some()
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_customer(id: i64) -> Customer {
        Customer {
            id,
            first_name: format!("First{}", id),
            middle_name: None,
            last_name: format!("Last{}", id),
            address: Some("12 Main St".into()),
            telephone: Some("0771234567".into()),
            description: None,
            added_by: Some(1),
            created_at: None,
            updated_at: None,
        }
    }

    fn test_item(item_id: i64, price_cents: i64, qty: i64) -> DraftItem {
        DraftItem {
            stock_id: item_id * 100,
            item_id,
            sku: format!("SKU-{}", item_id),
            name: format!("Item {}", item_id),
            description: String::new(),
            unit_price: Money::from_cents(price_cents),
            quantity: qty,
        }
    }

    #[test]
    fn test_add_item_merges_by_identity() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 500, 2));
        draft.add_item(test_item(2, 750, 1));
        draft.add_item(test_item(1, 500, 3));

        assert_eq!(draft.item_count(), 2);
        assert_eq!(draft.items[0].quantity, 5);
        assert_eq!(draft.items[1].quantity, 1);
    }

    #[test]
    fn test_merge_quantity_sums_per_identity() {
        let mut draft = InvoiceDraft::new();
        for qty in [2, 3, 4] {
            draft.add_item(test_item(9, 100, qty));
        }
        draft.add_item(test_item(10, 100, 1));

        assert_eq!(draft.item_count(), 2);
        assert_eq!(draft.items[0].quantity, 9);
    }

    #[test]
    fn test_parse_line_quantity_never_below_one() {
        assert_eq!(parse_line_quantity("0"), 1);
        assert_eq!(parse_line_quantity(""), 1);
        assert_eq!(parse_line_quantity("-5"), 1);
        assert_eq!(parse_line_quantity("abc"), 1);
        assert_eq!(parse_line_quantity("7"), 7);
        // Leading-digits semantics, like lenient numeric inputs.
        assert_eq!(parse_line_quantity("7abc"), 7);
    }

    #[test]
    fn test_set_item_quantity() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 500, 2));

        draft.set_item_quantity(0, "9");
        assert_eq!(draft.items[0].quantity, 9);

        draft.set_item_quantity(0, "0");
        assert_eq!(draft.items[0].quantity, 1);

        // Out-of-range index is ignored.
        draft.set_item_quantity(5, "3");
        assert_eq!(draft.item_count(), 1);
    }

    #[test]
    fn test_two_step_removal_preserves_order() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 100, 1));
        draft.add_item(test_item(2, 200, 1));
        draft.add_item(test_item(3, 300, 1));

        draft.request_remove_item(1);
        assert_eq!(draft.pending_removal().unwrap().item_id, 2);

        let removed = draft.confirm_remove_item().unwrap();
        assert_eq!(removed.item_id, 2);
        assert_eq!(draft.items[0].item_id, 1);
        assert_eq!(draft.items[1].item_id, 3);
        assert!(draft.pending_removal().is_none());
    }

    #[test]
    fn test_cancel_removal_is_a_noop() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 100, 1));
        draft.request_remove_item(0);
        draft.cancel_remove_item();
        assert!(draft.confirm_remove_item().is_none());
        assert_eq!(draft.item_count(), 1);
    }

    #[test]
    fn test_totals_percentage_discount() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 1000, 2)); // 20.00
        draft.add_item(test_item(2, 500, 1)); // 5.00
        draft.discount = Discount::Percentage { bps: 1000 }; // 10%

        let totals = draft.totals();
        assert_eq!(totals.subtotal.cents(), 2500);
        assert_eq!(totals.discount.cents(), 250);
        assert_eq!(totals.total.cents(), 2250);
        assert_eq!(totals.item_count, 2);
    }

    #[test]
    fn test_totals_is_pure_and_idempotent() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 1234, 3));
        draft.discount = Discount::Fixed {
            amount: Money::from_cents(500),
        };

        let first = draft.totals();
        let second = draft.totals();
        assert_eq!(first, second);
        assert_eq!(first.total, first.subtotal - first.discount);
    }

    #[test]
    fn test_fixed_discount_over_subtotal_goes_negative() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(1, 1000, 1));
        draft.discount = Discount::Fixed {
            amount: Money::from_cents(1500),
        };

        let totals = draft.totals();
        assert_eq!(totals.total.cents(), -500);
    }

    #[test]
    fn test_box_quantity_text_rules() {
        let mut draft = InvoiceDraft::new();
        assert_eq!(draft.box_quantity(), 0);

        draft.set_box_quantity_text("12");
        assert_eq!(draft.box_quantity(), 12);

        // Non-digit edits are ignored.
        draft.set_box_quantity_text("12a");
        assert_eq!(draft.box_quantity(), 12);

        // Empty intermediate state is allowed and reads as 0.
        draft.set_box_quantity_text("");
        assert_eq!(draft.box_quantity(), 0);

        draft.increment_box_quantity();
        draft.increment_box_quantity();
        assert_eq!(draft.box_quantity(), 2);

        draft.decrement_box_quantity();
        draft.decrement_box_quantity();
        draft.decrement_box_quantity(); // floors at 0
        assert_eq!(draft.box_quantity(), 0);
    }

    #[test]
    fn test_display_number_priority() {
        let mut draft = InvoiceDraft::new();
        assert_eq!(draft.display_invoice_number(), "AUTO");

        // Customer + item promotes AUTO to a provisional number.
        draft.select_customer(test_customer(1));
        draft.add_item(test_item(1, 100, 1));
        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 45).unwrap();
        draft.refresh_invoice_number(now);
        let display = draft.display_invoice_number();
        assert!(display.starts_with("INV-"));
        assert_eq!(display.len(), "INV-".len() + 4);

        // Confirmed number wins over everything.
        draft.clear_after_send("INV-000123".to_string());
        assert_eq!(draft.display_invoice_number(), "PENDING: INV-000123");
    }

    #[test]
    fn test_provisional_number_reverts_when_draft_empties() {
        let mut draft = InvoiceDraft::new();
        draft.select_customer(test_customer(1));
        draft.add_item(test_item(1, 100, 1));
        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        draft.refresh_invoice_number(now);
        assert_ne!(draft.invoice_number(), AUTO_INVOICE_NUMBER);

        draft.request_remove_item(0);
        draft.confirm_remove_item();
        draft.refresh_invoice_number(now);
        assert_eq!(draft.invoice_number(), AUTO_INVOICE_NUMBER);
    }

    #[test]
    fn test_select_customer_clears_stale_confirmation() {
        let mut draft = InvoiceDraft::new();
        draft.clear_after_send("INV-77".to_string());
        assert_eq!(draft.display_invoice_number(), "PENDING: INV-77");

        draft.select_customer(test_customer(2));
        assert_eq!(draft.display_invoice_number(), "AUTO");
        assert_eq!(draft.box_quantity(), 0);
    }

    #[test]
    fn test_recall_reproduces_source() {
        let mut draft = InvoiceDraft::new();
        draft.add_item(test_item(99, 100, 1)); // leftovers to be replaced

        let source = RecalledInvoice {
            id: 42,
            invoice_no: Some("INV-000042".into()),
            customer: Some(test_customer(7)),
            items: vec![test_item(1, 2500, 2), test_item(2, 900, 4)],
            paid_amount: Money::from_cents(1000),
            discount: Discount::Percentage { bps: 500 },
            box_quantity: 3,
        };
        draft.recall(source.clone());

        assert_eq!(draft.previous_invoice_id, Some(42));
        assert_eq!(draft.invoice_number(), "INV-000042");
        assert_eq!(draft.customer, source.customer);
        assert_eq!(draft.items, source.items);
        assert_eq!(draft.paid_amount, source.paid_amount);
        assert_eq!(draft.discount, source.discount);
        assert_eq!(draft.box_quantity(), 3);
    }

    #[test]
    fn test_recall_without_number_falls_back_to_id() {
        let mut draft = InvoiceDraft::new();
        draft.recall(RecalledInvoice {
            id: 9,
            invoice_no: None,
            customer: None,
            items: vec![],
            paid_amount: Money::zero(),
            discount: Discount::none(),
            box_quantity: 0,
        });
        assert_eq!(draft.invoice_number(), "INV-9");
    }

    #[test]
    fn test_clear_after_send_keeps_confirmed_number() {
        let mut draft = InvoiceDraft::new();
        draft.select_customer(test_customer(1));
        draft.add_item(test_item(1, 100, 2));
        draft.set_box_quantity_text("2");
        draft.paid_amount = Money::from_cents(500);

        draft.clear_after_send("INV-000050".to_string());

        assert!(draft.is_empty());
        assert!(!draft.has_customer());
        assert_eq!(draft.box_quantity(), 0);
        assert!(draft.paid_amount.is_zero());
        assert_eq!(draft.previous_invoice_id, None);
        assert_eq!(draft.display_invoice_number(), "PENDING: INV-000050");
        assert_eq!(draft.state(), DraftState::Finalized(DraftOutcome::Sent));
    }

    #[test]
    fn test_clear_after_cancel_resets_everything() {
        let mut draft = InvoiceDraft::new();
        draft.select_customer(test_customer(1));
        draft.add_item(test_item(1, 100, 2));
        draft.record_draft_save(310);
        draft.clear_after_cancel();

        assert!(draft.is_empty());
        assert!(!draft.has_customer());
        assert_eq!(draft.display_invoice_number(), "AUTO");
        assert_eq!(
            draft.state(),
            DraftState::Finalized(DraftOutcome::Cancelled)
        );
        // The backing record id survives for audit; only the form clears.
        assert_eq!(draft.last_draft_record_id(), Some(310));
    }

    #[test]
    fn test_recovery_marks_finalized_without_clearing() {
        let mut draft = InvoiceDraft::new();
        draft.select_customer(test_customer(1));
        draft.add_item(test_item(1, 100, 2));

        draft.record_draft_save(17);
        draft.mark_recovered();

        assert!(draft.is_finalized());
        assert_eq!(draft.last_draft_record_id(), Some(17));
        assert_eq!(draft.item_count(), 1);
    }
}
