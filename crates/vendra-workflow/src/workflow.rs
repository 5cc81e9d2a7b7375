//! # Invoice Workflow
//!
//! Orchestrates the draft state machine against the ERP: send, cancel,
//! recall, and the auto-save-on-teardown path.
//!
//! ## Send Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           send()                                        │
//! │                                                                         │
//! │  validate: customer, items, identity, box qty >= 1                      │
//! │       │            (failures surface here, nothing goes out)            │
//! │       ▼                                                                 │
//! │  POST /pos/invoice          status PENDING, totals, discount            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /pos/invoice/{id}/item   × N, all issued concurrently,            │
//! │       │                        all must succeed                         │
//! │       ▼                                                                 │
//! │  PATCH /pos/invoice/{id}    make it visible to the cashier queue        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clear the form, keep the confirmed number on display                   │
//! │                                                                         │
//! │  Any step failing leaves the local draft untouched so the cashier can   │
//! │  retry. Already-created remote records are NOT rolled back; the ERP     │
//! │  has no compensation endpoint and inventing one here would change the   │
//! │  deployed behavior.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The auto-save path mirrors the send but is best effort end to end: its
//! outcome is reported, logged, and never blocks whatever navigation
//! triggered it.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::{join_all, try_join_all};
use tracing::{info, warn};

use vendra_client::identity::IdentityProvider;
use vendra_client::invoices::{NewInvoice, NewInvoiceItem};
use vendra_client::wire::{decimal_from_money, percent_from_bps};
use vendra_client::{ApiClient, InvoiceRecord};
use vendra_core::types::{CANCELLED_ALTERNATE_SPELLING, Discount, InvoiceStatus};
use vendra_core::{CoreError, Customer, DraftItem, InvoiceDraft};

use crate::error::WorkflowResult;
use crate::offline::{DraftSaveReason, OfflineDraft};
use crate::storage::KeyStore;

/// What a successful send yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub invoice_id: i64,
    pub invoice_no: String,
}

/// How the remote half of a cancel went. The local half always clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCancel {
    /// Nothing was ever persisted for this draft, so nothing to void.
    NoBackingRecord,
    /// The canonical CANCELLED status landed.
    Cancelled,
    /// The first attempt was rejected; the CANCELED spelling landed.
    CancelledWithAlternateSpelling,
    /// Both spellings failed. The record stays whatever it was.
    Failed,
}

/// Outcome of an auto-save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The draft already finalized (sent, cancelled, or saved once).
    AlreadyFinalized,
    /// No items, nothing worth saving.
    NothingToSave,
    /// No user identity could be resolved; the save is silently skipped.
    MissingIdentity,
    /// No customer chosen; the raw draft went to the local blob instead.
    StashedLocally,
    /// A recovery record was created remotely.
    Saved { invoice_id: i64 },
    /// Both the ACTIVE create and its SENT fallback failed.
    SaveFailed,
}

// =============================================================================
// Workflow
// =============================================================================

/// One invoice-creation screen's worth of state and orchestration.
pub struct InvoiceWorkflow {
    /// The draft being assembled. Mutate through the methods below where
    /// one exists; they keep the provisional invoice number current.
    pub draft: InvoiceDraft,
    client: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    offline_store: Arc<dyn KeyStore>,
}

impl InvoiceWorkflow {
    pub fn new(
        client: ApiClient,
        identity: Arc<dyn IdentityProvider>,
        offline_store: Arc<dyn KeyStore>,
    ) -> Self {
        InvoiceWorkflow {
            draft: InvoiceDraft::new(),
            client,
            identity,
            offline_store,
        }
    }

    /// Name for the "Billing by" header line.
    pub fn billing_by(&self) -> String {
        self.identity.display_name()
    }

    // =========================================================================
    // Draft Mutations
    // =========================================================================
    // Thin passthroughs that re-evaluate the provisional invoice number,
    // the way the screen re-evaluates it after every relevant change.

    pub fn select_customer(&mut self, customer: Customer) {
        self.draft.select_customer(customer);
        self.refresh_number();
    }

    pub fn add_item(&mut self, line: DraftItem) {
        self.draft.clear_stale_confirmation();
        self.draft.add_item(line);
        self.refresh_number();
    }

    pub fn set_item_quantity(&mut self, index: usize, raw: &str) {
        self.draft.set_item_quantity(index, raw);
    }

    pub fn confirm_remove_item(&mut self) -> Option<DraftItem> {
        let removed = self.draft.confirm_remove_item();
        self.refresh_number();
        removed
    }

    fn refresh_number(&mut self) {
        self.draft.refresh_invoice_number(Utc::now());
    }

    // =========================================================================
    // Send
    // =========================================================================

    /// Sends the draft to the cashier queue.
    ///
    /// Preconditions are checked before anything goes out; on any remote
    /// failure the error is returned and the draft is left as it was.
    pub async fn send(&mut self) -> WorkflowResult<SendReceipt> {
        let customer_id = self
            .draft
            .customer
            .as_ref()
            .map(|c| c.id)
            .ok_or(CoreError::CustomerRequired)?;
        if self.draft.is_empty() {
            return Err(CoreError::EmptyInvoice.into());
        }
        let user_id = self
            .identity
            .current_user_id()
            .ok_or(CoreError::MissingUserIdentity)?;
        let box_quantity = self.draft.box_quantity();
        if box_quantity < 1 {
            return Err(CoreError::BoxQuantityTooLow {
                requested: box_quantity,
            }
            .into());
        }

        let totals = self.draft.totals();
        let discount_wire = self.draft.discount.kind().as_wire();
        let payload = NewInvoice {
            customer_id,
            created_user_id: user_id,
            status: InvoiceStatus::Pending.as_wire().to_string(),
            previous_invoice_id: self.draft.previous_invoice_id,
            total_amount: decimal_from_money(totals.total),
            discount_type: discount_wire.to_string(),
            discount_amount: positive_discount_amount(&self.draft.discount),
            paid_amount: if self.draft.paid_amount.is_positive() {
                Some(decimal_from_money(self.draft.paid_amount))
            } else {
                None
            },
            next_box_number: box_quantity,
        };

        let created = self.client.invoices().create(&payload).await?;
        let invoice_no = created.display_number();
        info!(invoice_id = created.id, invoice_no = %invoice_no, "invoice created");

        // All attachments go out together and all must land.
        let attachments = self.draft.items.iter().map(|item| {
            let invoices = self.client.invoices();
            let item_payload = NewInvoiceItem::from_draft_item(item, discount_wire);
            async move { invoices.add_item(created.id, &item_payload).await }
        });
        try_join_all(attachments).await?;

        self.client.invoices().mark_ready_for_cashier(created.id).await?;

        info!(
            invoice_id = created.id,
            items = totals.item_count,
            total = %totals.total,
            "invoice sent to cashier"
        );

        self.draft.clear_after_send(invoice_no.clone());
        OfflineDraft::clear(self.offline_store.as_ref());

        Ok(SendReceipt {
            invoice_id: created.id,
            invoice_no,
        })
    }

    // =========================================================================
    // Cancel
    // =========================================================================

    /// Cancels the draft.
    ///
    /// When a backing record exists (the last auto-saved draft, or the
    /// recalled source), a CANCELLED status update is attempted, falling
    /// back once to the CANCELED spelling. The local draft clears no
    /// matter what the remote half did.
    pub async fn cancel(&mut self) -> RemoteCancel {
        let target = self
            .draft
            .last_draft_record_id()
            .or(self.draft.previous_invoice_id);

        let remote = match target {
            None => RemoteCancel::NoBackingRecord,
            Some(invoice_id) => {
                match self
                    .client
                    .invoices()
                    .set_status(invoice_id, InvoiceStatus::Cancelled.as_wire())
                    .await
                {
                    Ok(_) => RemoteCancel::Cancelled,
                    Err(first) => {
                        warn!(invoice_id, error = %first, "CANCELLED rejected, retrying with alternate spelling");
                        match self
                            .client
                            .invoices()
                            .set_status(invoice_id, CANCELLED_ALTERNATE_SPELLING)
                            .await
                        {
                            Ok(_) => RemoteCancel::CancelledWithAlternateSpelling,
                            Err(second) => {
                                warn!(invoice_id, error = %second, "cancel failed under both spellings");
                                RemoteCancel::Failed
                            }
                        }
                    }
                }
            }
        };

        OfflineDraft::clear(self.offline_store.as_ref());
        self.draft.clear_after_cancel();
        info!(?remote, "invoice cancelled locally");
        remote
    }

    // =========================================================================
    // Recall
    // =========================================================================

    /// Replaces the draft with a previously persisted invoice.
    ///
    /// When the record arrived without embedded items, the full record is
    /// fetched first; a failed fetch is logged and the recall proceeds
    /// with whatever the listing carried.
    pub async fn recall(&mut self, mut record: InvoiceRecord) {
        if !record.has_items() {
            match self.client.invoices().get(record.id).await {
                Ok(full) => record = full,
                Err(e) => {
                    warn!(invoice_id = record.id, error = %e, "could not fetch full invoice for recall");
                }
            }
        }

        info!(invoice_id = record.id, "invoice recalled into draft");
        self.draft.recall(record.to_recalled());
    }

    // =========================================================================
    // Auto-Save
    // =========================================================================

    /// Saves the in-progress draft when the cashier leaves the screen
    /// without finalizing.
    ///
    /// Best effort end to end: every early exit and failure is reported in
    /// the outcome and logged, never raised, because the navigation that
    /// triggered this has already happened.
    pub async fn persist_active_draft(&mut self, reason: DraftSaveReason) -> PersistOutcome {
        if self.draft.is_finalized() {
            return PersistOutcome::AlreadyFinalized;
        }
        if self.draft.is_empty() {
            return PersistOutcome::NothingToSave;
        }
        let Some(user_id) = self.identity.current_user_id() else {
            return PersistOutcome::MissingIdentity;
        };

        // No customer means no ERP record to hang the items off; stash the
        // raw draft locally so the items are not silently lost.
        let Some(customer_id) = self.draft.customer.as_ref().map(|c| c.id) else {
            OfflineDraft::from_draft(&self.draft, reason, Utc::now())
                .stash(self.offline_store.as_ref());
            return PersistOutcome::StashedLocally;
        };

        let totals = self.draft.totals();
        let discount_wire = self.draft.discount.kind().as_str();
        let payload = NewInvoice {
            customer_id,
            created_user_id: user_id,
            status: InvoiceStatus::Active.as_wire().to_string(),
            previous_invoice_id: self.draft.previous_invoice_id,
            total_amount: decimal_from_money(totals.total),
            discount_type: discount_wire.to_string(),
            discount_amount: Some(wire_discount_amount(&self.draft.discount)),
            paid_amount: Some(decimal_from_money(self.draft.paid_amount)),
            next_box_number: self.draft.box_quantity(),
        };

        let created = match self.client.invoices().create(&payload).await {
            Ok(record) => record,
            Err(first) => {
                // Some backend versions reject ACTIVE; SENT is the safe
                // draft status they all accept.
                warn!(reason = %reason, error = %first, "ACTIVE draft save rejected, retrying as SENT");
                match self
                    .client
                    .invoices()
                    .create(&payload.with_status(InvoiceStatus::Sent))
                    .await
                {
                    Ok(record) => record,
                    Err(second) => {
                        warn!(reason = %reason, error = %second, "failed to persist draft invoice");
                        return PersistOutcome::SaveFailed;
                    }
                }
            }
        };

        self.draft.record_draft_save(created.id);

        // Attach whatever we can; a failed line is logged, not raised.
        let attachments = self.draft.items.iter().map(|item| {
            let invoices = self.client.invoices();
            let item_payload = NewInvoiceItem::from_draft_item(item, discount_wire);
            async move { invoices.add_item(created.id, &item_payload).await }
        });
        let failed = join_all(attachments)
            .await
            .into_iter()
            .filter(|r| r.is_err())
            .count();
        if failed > 0 {
            warn!(invoice_id = created.id, failed, "some draft items failed to attach");
        }

        self.draft.mark_recovered();
        OfflineDraft::clear(self.offline_store.as_ref());
        info!(invoice_id = created.id, reason = %reason, "draft saved as recovery record");

        PersistOutcome::Saved {
            invoice_id: created.id,
        }
    }
}

/// The discount amount the send payload carries, only when positive.
fn positive_discount_amount(discount: &Discount) -> Option<f64> {
    let amount = wire_discount_amount(discount);
    (amount > 0.0).then_some(amount)
}

/// The wire scalar for a discount: percent for percentage, decimal amount
/// for fixed.
fn wire_discount_amount(discount: &Discount) -> f64 {
    match *discount {
        Discount::Percentage { bps } => percent_from_bps(bps),
        Discount::Fixed { amount } => decimal_from_money(amount),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
