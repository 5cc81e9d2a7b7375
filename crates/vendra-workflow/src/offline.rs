//! # Offline Draft Blob
//!
//! When a draft with items is torn down before a customer was chosen, an
//! ERP record cannot be created (there is nothing to attach it to), so the
//! raw draft is stashed in the persistent store instead. At most one blob
//! exists; a later stash overwrites, and a successful send, cancel, or
//! remote save clears it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vendra_core::types::{Customer, Discount};
use vendra_core::{DraftItem, InvoiceDraft, Money};

use crate::storage::{keys, KeyStore};

/// Why an auto-save fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSaveReason {
    /// The cashier pressed back.
    Back,
    /// The screen was torn down.
    Unmount,
}

impl std::fmt::Display for DraftSaveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftSaveReason::Back => write!(f, "back"),
            DraftSaveReason::Unmount => write!(f, "unmount"),
        }
    }
}

/// The stashed draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineDraft {
    pub reason: DraftSaveReason,
    pub saved_at: DateTime<Utc>,
    /// Always None today (a draft with a customer saves remotely instead),
    /// kept in the shape so older blobs load.
    pub customer: Option<Customer>,
    pub items: Vec<DraftItem>,
    pub box_quantity: String,
    pub discount: Discount,
    pub paid_amount: Money,
}

impl OfflineDraft {
    /// Snapshots the draft for stashing.
    pub fn from_draft(draft: &InvoiceDraft, reason: DraftSaveReason, saved_at: DateTime<Utc>) -> Self {
        OfflineDraft {
            reason,
            saved_at,
            customer: draft.customer.clone(),
            items: draft.items.clone(),
            box_quantity: draft.box_quantity_text.clone(),
            discount: draft.discount,
            paid_amount: draft.paid_amount,
        }
    }

    /// Writes the blob under its fixed key.
    pub fn stash(&self, store: &dyn KeyStore) {
        match serde_json::to_string(self) {
            Ok(blob) => {
                store.set(keys::OFFLINE_DRAFT, &blob);
                debug!(reason = %self.reason, items = self.items.len(), "draft stashed locally");
            }
            Err(e) => warn!(error = %e, "could not serialize offline draft"),
        }
    }

    /// Loads the blob, if one exists and still parses.
    pub fn load(store: &dyn KeyStore) -> Option<OfflineDraft> {
        let blob = store.get(keys::OFFLINE_DRAFT)?;
        match serde_json::from_str(&blob) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(error = %e, "offline draft blob unreadable");
                None
            }
        }
    }

    /// Removes the blob.
    pub fn clear(store: &dyn KeyStore) {
        store.remove(keys::OFFLINE_DRAFT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn draft_with_item() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.add_item(DraftItem {
            stock_id: 31,
            item_id: 7,
            sku: "RICE-5KG".into(),
            name: "Rice 5kg".into(),
            description: String::new(),
            unit_price: Money::from_cents(12550),
            quantity: 2,
        });
        draft.set_box_quantity_text("2");
        draft
    }

    #[test]
    fn test_stash_load_round_trip() {
        let store = MemoryStore::new();
        let draft = draft_with_item();
        let snapshot = OfflineDraft::from_draft(&draft, DraftSaveReason::Unmount, Utc::now());
        snapshot.stash(&store);

        let loaded = OfflineDraft::load(&store).unwrap();
        assert_eq!(loaded.reason, DraftSaveReason::Unmount);
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].sku, "RICE-5KG");
        assert_eq!(loaded.box_quantity, "2");
        assert!(loaded.customer.is_none());
    }

    #[test]
    fn test_clear_removes_blob() {
        let store = MemoryStore::new();
        OfflineDraft::from_draft(&draft_with_item(), DraftSaveReason::Back, Utc::now())
            .stash(&store);
        OfflineDraft::clear(&store);
        assert!(OfflineDraft::load(&store).is_none());
    }

    #[test]
    fn test_unreadable_blob_loads_as_none() {
        let store = MemoryStore::new();
        store.set(keys::OFFLINE_DRAFT, "{broken");
        assert!(OfflineDraft::load(&store).is_none());
    }
}
