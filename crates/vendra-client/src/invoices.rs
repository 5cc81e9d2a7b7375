//! # Invoice Endpoints
//!
//! The invoice lifecycle against the ERP:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Endpoints                                  │
//! │                                                                         │
//! │  GET  /pos/invoices           list for history/recall views            │
//! │  GET  /pos/invoice/{id}       full record incl. items, for recall      │
//! │  POST /pos/invoice            create (PENDING on send, ACTIVE on       │
//! │                               auto-save, SENT as the save fallback)    │
//! │  POST /pos/invoice/{id}/item  attach one draft line                    │
//! │  PATCH /pos/invoice/{id}      status transitions and field patches     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are wire-tolerant: ids may be strings, amounts arrive as
//! decimals, embedded objects may be missing or oddly shaped. Conversion to
//! the core types happens here and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use vendra_core::types::{Discount, DiscountType, InvoiceStatus};
use vendra_core::{DraftItem, RecalledInvoice};

use crate::customers::{parse_rows, CustomerRecord};
use crate::envelope;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::wire::{bps_from_percent, lenient_f64, lenient_i64, lenient_record, money_from_decimal};

// =============================================================================
// Wire Records
// =============================================================================

/// The creating user, when the ERP embeds one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedUserRecord {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
}

impl CreatedUserRecord {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// The stock row embedded inside a persisted invoice item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedStockRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, alias = "itemId", deserialize_with = "lenient_i64")]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A persisted invoice item as the ERP returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceItemRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,

    #[serde(default, alias = "stockId", deserialize_with = "lenient_i64")]
    pub stock_id: Option<i64>,

    #[serde(default, alias = "qty", deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,

    #[serde(default, alias = "unitPrice", deserialize_with = "lenient_f64")]
    pub selling_price: Option<f64>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_record")]
    pub stock: Option<EmbeddedStockRecord>,
}

impl InvoiceItemRecord {
    /// Remaps this persisted shape to a draft line, field by field.
    /// Embedded stock fields win, then the flat fields, then placeholders.
    pub fn to_draft_item(&self) -> DraftItem {
        let stock = self.stock.as_ref();
        let stock_id = self.stock_id.or(self.id).unwrap_or(0);
        DraftItem {
            stock_id,
            item_id: stock.and_then(|s| s.item_id).unwrap_or(stock_id),
            sku: stock
                .and_then(|s| s.sku.clone())
                .or_else(|| self.sku.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            name: stock
                .and_then(|s| s.name.clone())
                .or_else(|| self.name.clone())
                .unwrap_or_else(|| "Unknown Item".to_string()),
            description: stock
                .and_then(|s| s.description.clone())
                .or_else(|| self.description.clone())
                .unwrap_or_default(),
            unit_price: money_from_decimal(self.selling_price.unwrap_or(0.0)),
            quantity: self.quantity.unwrap_or(0.0) as i64,
        }
    }
}

/// A persisted invoice. Rows without a numeric `id` fail to parse and are
/// skipped by the list call.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRecord {
    pub id: i64,

    #[serde(default)]
    pub invoice_no: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(
        default,
        alias = "customerId",
        alias = "customerID",
        deserialize_with = "lenient_i64"
    )]
    pub customer_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub previous_invoice_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub created_user_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub paid_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,

    #[serde(default)]
    pub discount_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub discount_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub next_box_number: Option<i64>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient_record")]
    pub created_user: Option<CreatedUserRecord>,

    /// Some backends embed the customer, some put a bare id or a display
    /// string here; anything that is not a record reads as None.
    #[serde(default, deserialize_with = "lenient_record")]
    pub customer: Option<CustomerRecord>,

    #[serde(default, deserialize_with = "lenient_record")]
    pub invoice_items: Option<Vec<InvoiceItemRecord>>,
}

impl InvoiceRecord {
    /// Parsed status; a missing field reads as Unknown.
    pub fn parsed_status(&self) -> InvoiceStatus {
        InvoiceStatus::parse(self.status.as_deref().unwrap_or(""))
    }

    /// Only pending/active (or legacy sent) records are offered for recall.
    pub fn is_recallable(&self) -> bool {
        self.parsed_status().is_recallable()
    }

    /// Display number, `INV-<id>` when the ERP did not assign one.
    pub fn display_number(&self) -> String {
        self.invoice_no
            .clone()
            .unwrap_or_else(|| format!("INV-{}", self.id))
    }

    /// Customer id, tolerating the embedded-customer-only shape.
    pub fn resolved_customer_id(&self) -> Option<i64> {
        self.customer_id
            .or_else(|| self.customer.as_ref().and_then(|c| c.id))
            .filter(|id| *id > 0)
    }

    /// Whether any items came embedded in this record.
    pub fn has_items(&self) -> bool {
        self.invoice_items
            .as_ref()
            .map(|items| !items.is_empty())
            .unwrap_or(false)
    }

    /// Remaps the whole record into the draft's recall input.
    pub fn to_recalled(&self) -> RecalledInvoice {
        let discount_amount = self.discount_amount.unwrap_or(0.0);
        let discount = match DiscountType::parse(self.discount_type.as_deref().unwrap_or("")) {
            DiscountType::Percentage => Discount::Percentage {
                bps: bps_from_percent(discount_amount),
            },
            DiscountType::Fixed => Discount::Fixed {
                amount: money_from_decimal(discount_amount),
            },
        };

        RecalledInvoice {
            id: self.id,
            invoice_no: self.invoice_no.clone(),
            customer: self
                .customer
                .clone()
                .and_then(CustomerRecord::into_domain),
            items: self
                .invoice_items
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(InvoiceItemRecord::to_draft_item)
                .collect(),
            paid_amount: money_from_decimal(self.paid_amount.unwrap_or(0.0)),
            discount,
            box_quantity: self.next_box_number.unwrap_or(0),
        }
    }
}

// =============================================================================
// Write Payloads
// =============================================================================

/// Payload for `POST /pos/invoice`.
#[derive(Debug, Clone, Serialize)]
pub struct NewInvoice {
    pub customer_id: i64,
    pub created_user_id: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_invoice_id: Option<i64>,
    pub total_amount: f64,
    pub discount_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<f64>,
    pub next_box_number: i64,
}

impl NewInvoice {
    /// Same payload with a different status, for the single save-status
    /// fallback.
    pub fn with_status(&self, status: InvoiceStatus) -> NewInvoice {
        NewInvoice {
            status: status.as_wire().to_string(),
            ..self.clone()
        }
    }
}

/// Payload for `POST /pos/invoice/{id}/item`.
#[derive(Debug, Clone, Serialize)]
pub struct NewInvoiceItem {
    pub stock_id: i64,
    pub quantity: i64,
    pub selling_price: f64,
    pub discount_type: String,
    /// Line-level discounts are not used by the terminal; the ERP expects
    /// the field regardless.
    pub discount_amount: f64,
}

impl NewInvoiceItem {
    /// Builds the attachment payload for one draft line. `discount_type`
    /// is passed as the raw wire string because the send and auto-save
    /// paths historically disagree on its case.
    pub fn from_draft_item(item: &DraftItem, discount_type: &str) -> Self {
        NewInvoiceItem {
            stock_id: item.stock_id,
            quantity: item.quantity,
            selling_price: crate::wire::decimal_from_money(item.unit_price),
            discount_type: discount_type.to_string(),
            discount_amount: 0.0,
        }
    }
}

// =============================================================================
// Endpoint Wrapper
// =============================================================================

/// Invoice endpoint wrapper. Obtained via [`ApiClient::invoices`].
pub struct InvoicesApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl InvoicesApi<'_> {
    /// `GET /pos/invoices`.
    pub async fn list(&self) -> ClientResult<Vec<InvoiceRecord>> {
        let response = self.client.get("/pos/invoices", &[]).await?;
        Ok(parse_rows(&response, "invoices"))
    }

    /// `GET /pos/invoice/{id}`, unwrapped to the record.
    pub async fn get(&self, id: i64) -> ClientResult<InvoiceRecord> {
        let response = self.client.get(&format!("/pos/invoice/{}", id), &[]).await?;
        let record = envelope::unwrap_object(&response);
        Ok(serde_json::from_value(record)?)
    }

    /// `POST /pos/invoice`.
    pub async fn create(&self, new: &NewInvoice) -> ClientResult<InvoiceRecord> {
        let body = serde_json::to_value(new)?;
        let response = self.client.post("/pos/invoice", &body).await?;
        let record = envelope::unwrap_object(&response);
        Ok(serde_json::from_value(record)?)
    }

    /// `POST /pos/invoice/{id}/item`.
    pub async fn add_item(&self, invoice_id: i64, item: &NewInvoiceItem) -> ClientResult<Value> {
        let body = serde_json::to_value(item)?;
        self.client
            .post(&format!("/pos/invoice/{}/item", invoice_id), &body)
            .await
    }

    /// `PATCH /pos/invoice/{id}` with arbitrary fields.
    pub async fn update(&self, id: i64, patch: &Value) -> ClientResult<Value> {
        self.client
            .patch(&format!("/pos/invoice/{}", id), patch)
            .await
    }

    /// Status-only patch. The cancel fallback spelling goes through here
    /// too, which is why this takes a raw string.
    pub async fn set_status(&self, id: i64, status: &str) -> ClientResult<Value> {
        self.update(id, &json!({ "status": status })).await
    }

    /// The finalize step of a send: make the created invoice visible to
    /// the cashier queue.
    pub async fn mark_ready_for_cashier(&self, id: i64) -> ClientResult<Value> {
        self.set_status(id, InvoiceStatus::Pending.as_wire()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vendra_core::Money;

    #[test]
    fn test_item_remap_prefers_embedded_stock() {
        let record: InvoiceItemRecord = serde_json::from_value(json!({
            "id": 900,
            "stock_id": 31,
            "quantity": 2,
            "selling_price": 125.5,
            "name": "flat name",
            "stock": { "item_id": 7, "sku": "RICE-5KG", "name": "Rice 5kg", "description": "white" }
        }))
        .unwrap();

        let line = record.to_draft_item();
        assert_eq!(line.stock_id, 31);
        assert_eq!(line.item_id, 7);
        assert_eq!(line.sku, "RICE-5KG");
        assert_eq!(line.name, "Rice 5kg");
        assert_eq!(line.description, "white");
        assert_eq!(line.unit_price.cents(), 12550);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_item_remap_placeholders() {
        let record: InvoiceItemRecord = serde_json::from_value(json!({ "id": 5 })).unwrap();
        let line = record.to_draft_item();
        assert_eq!(line.stock_id, 5); // falls back to the row id
        assert_eq!(line.sku, "N/A");
        assert_eq!(line.name, "Unknown Item");
        assert_eq!(line.unit_price.cents(), 0);
        assert_eq!(line.quantity, 0);
    }

    #[test]
    fn test_record_status_and_recallability() {
        let pending: InvoiceRecord =
            serde_json::from_value(json!({"id": 1, "status": "PENDING"})).unwrap();
        assert!(pending.is_recallable());

        let sent: InvoiceRecord =
            serde_json::from_value(json!({"id": 2, "status": "SENT"})).unwrap();
        assert!(sent.is_recallable()); // legacy spelling of pending

        let cancelled: InvoiceRecord =
            serde_json::from_value(json!({"id": 3, "status": "CANCELLED"})).unwrap();
        assert!(!cancelled.is_recallable());
    }

    #[test]
    fn test_customer_id_from_embedded_customer() {
        let record: InvoiceRecord = serde_json::from_value(json!({
            "id": 1, "customer": { "id": 44 }
        }))
        .unwrap();
        assert_eq!(record.resolved_customer_id(), Some(44));

        // A display string where the customer object belongs is tolerated.
        let stringly: InvoiceRecord = serde_json::from_value(json!({
            "id": 2, "customer": "Walk-in", "customerId": "9"
        }))
        .unwrap();
        assert_eq!(stringly.resolved_customer_id(), Some(9));
    }

    #[test]
    fn test_to_recalled_reproduces_amounts() {
        let record: InvoiceRecord = serde_json::from_value(json!({
            "id": 42,
            "invoice_no": "INV-000042",
            "status": "PENDING",
            "paid_amount": 1000.0,
            "discount_type": "PERCENTAGE",
            "discount_amount": 5,
            "next_box_number": 3,
            "customer": { "id": 7, "first_name": "Nimal", "last_name": "Perera" },
            "invoice_items": [
                { "stock_id": 1, "quantity": 2, "selling_price": 25.0 },
                { "stock_id": 2, "quantity": 4, "selling_price": 9.0 }
            ]
        }))
        .unwrap();

        let recalled = record.to_recalled();
        assert_eq!(recalled.id, 42);
        assert_eq!(recalled.invoice_no.as_deref(), Some("INV-000042"));
        assert_eq!(recalled.items.len(), 2);
        assert_eq!(recalled.paid_amount.cents(), 100000);
        assert_eq!(recalled.discount, Discount::Percentage { bps: 500 });
        assert_eq!(recalled.box_quantity, 3);
        assert_eq!(recalled.customer.as_ref().unwrap().id, 7);
    }

    #[test]
    fn test_new_invoice_serialization_skips_absent_amounts() {
        let new = NewInvoice {
            customer_id: 7,
            created_user_id: 4,
            status: "PENDING".into(),
            previous_invoice_id: None,
            total_amount: 225.0,
            discount_type: "PERCENTAGE".into(),
            discount_amount: None,
            paid_amount: None,
            next_box_number: 2,
        };
        let value = serde_json::to_value(&new).unwrap();
        assert!(value.get("previous_invoice_id").is_none());
        assert!(value.get("paid_amount").is_none());
        assert_eq!(value["status"], "PENDING");

        let fallback = new.with_status(InvoiceStatus::Sent);
        assert_eq!(fallback.status, "SENT");
        assert_eq!(fallback.customer_id, 7);
    }

    #[test]
    fn test_item_payload_from_draft_line() {
        let line = DraftItem {
            stock_id: 31,
            item_id: 7,
            sku: "RICE-5KG".into(),
            name: "Rice 5kg".into(),
            description: String::new(),
            unit_price: Money::from_cents(12550),
            quantity: 2,
        };
        let payload = NewInvoiceItem::from_draft_item(&line, DiscountType::Percentage.as_wire());
        assert_eq!(payload.stock_id, 31);
        assert_eq!(payload.quantity, 2);
        assert_eq!(payload.selling_price, 125.5);
        assert_eq!(payload.discount_type, "PERCENTAGE");
        assert_eq!(payload.discount_amount, 0.0);
    }
}
