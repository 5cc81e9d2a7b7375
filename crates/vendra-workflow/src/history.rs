//! # Invoice History Views
//!
//! Two listings over `GET /pos/invoices`:
//!
//! - [`RecallList`]: the recall picker. Joins customer names (invoices
//!   often arrive without an embedded customer), keeps only recallable
//!   records, searches across id, number, date, customer, and creator,
//!   and pages at 10 rows.
//! - [`PreviousInvoices`]: the full history listing. Searches number,
//!   status, and creator, pages at 20 rows.

use std::collections::HashMap;

use futures_util::join;
use tracing::warn;

use vendra_client::{ApiClient, CustomerRecord, InvoiceRecord};
use vendra_core::paging::Pager;

// =============================================================================
// Recall List
// =============================================================================

pub struct RecallList {
    client: ApiClient,
    invoices: Vec<InvoiceRecord>,
    customers_by_id: HashMap<i64, CustomerRecord>,
    search: String,
    pub pager: Pager,
}

impl RecallList {
    pub fn new(client: ApiClient) -> Self {
        RecallList {
            client,
            invoices: Vec::new(),
            customers_by_id: HashMap::new(),
            search: String::new(),
            pager: Pager::default(),
        }
    }

    /// Loads invoices and the full customer list concurrently, attaches
    /// customers to invoices that arrived without one, and keeps only
    /// recallable records. Failed reads degrade to empty listings.
    pub async fn load(&mut self) {
        let invoices_api = self.client.invoices();
        let customers_api = self.client.customers();
        let (invoices, customers) = join!(
            invoices_api.list(),
            customers_api.fetch_all()
        );

        let customers = customers.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load customers for recall list");
            Vec::new()
        });
        self.customers_by_id = customers
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c)))
            .collect();

        let mut invoices = invoices.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load invoices");
            Vec::new()
        });

        // Attach the customer record when the backend left it out.
        for invoice in &mut invoices {
            if invoice.customer.is_none() {
                if let Some(id) = invoice.resolved_customer_id() {
                    invoice.customer = self.customers_by_id.get(&id).cloned();
                }
            }
        }

        self.invoices = invoices
            .into_iter()
            .filter(InvoiceRecord::is_recallable)
            .collect();
        self.pager.reset();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.pager.reset();
    }

    /// Display name for an invoice's customer: the embedded record, then
    /// the joined map, then a placeholder naming the id when one exists.
    pub fn customer_name(&self, invoice: &InvoiceRecord) -> String {
        if let Some(customer) = &invoice.customer {
            return customer.display_name();
        }
        match invoice.resolved_customer_id() {
            Some(id) => self
                .customers_by_id
                .get(&id)
                .map(CustomerRecord::display_name)
                .unwrap_or_else(|| format!("Customer {}", id)),
            None => "Customer".to_string(),
        }
    }

    /// Rows matching the search across id, invoice number, creation date,
    /// customer name, and creator name.
    pub fn filtered(&self) -> Vec<&InvoiceRecord> {
        let needle = self.search.to_lowercase();
        self.invoices
            .iter()
            .filter(|inv| {
                if needle.is_empty() {
                    return true;
                }
                inv.id.to_string().contains(&needle)
                    || inv
                        .invoice_no
                        .as_deref()
                        .map(|no| no.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || inv
                        .created_at
                        .as_deref()
                        .map(|at| at.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || self.customer_name(inv).to_lowercase().contains(&needle)
                    || inv
                        .created_user
                        .as_ref()
                        .map(|u| u.display_name().to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn page(&self) -> Vec<InvoiceRecord> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).iter().map(|inv| (*inv).clone()).collect()
    }

    /// The record to hand to the workflow's recall, by id.
    pub fn take_for_recall(&self, invoice_id: i64) -> Option<InvoiceRecord> {
        self.invoices.iter().find(|inv| inv.id == invoice_id).cloned()
    }
}

// =============================================================================
// Previous Invoices
// =============================================================================

pub struct PreviousInvoices {
    client: ApiClient,
    invoices: Vec<InvoiceRecord>,
    search: String,
    pub pager: Pager,
}

impl PreviousInvoices {
    /// Rows per page of the history listing.
    pub const PAGE_SIZE: usize = 20;

    pub fn new(client: ApiClient) -> Self {
        PreviousInvoices {
            client,
            invoices: Vec::new(),
            search: String::new(),
            pager: Pager::new(Self::PAGE_SIZE),
        }
    }

    /// Loads the full history. A failed read degrades to an empty listing.
    pub async fn load(&mut self) {
        match self.client.invoices().list().await {
            Ok(invoices) => self.invoices = invoices,
            Err(e) => {
                warn!(error = %e, "failed to load invoices");
                self.invoices = Vec::new();
            }
        }
        self.pager.reset();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.pager.reset();
    }

    /// Rows matching the search across invoice number, status, and
    /// creator name.
    pub fn filtered(&self) -> Vec<&InvoiceRecord> {
        let needle = self.search.to_lowercase();
        self.invoices
            .iter()
            .filter(|inv| {
                if needle.is_empty() {
                    return true;
                }
                inv.invoice_no
                    .as_deref()
                    .map(|no| no.to_lowercase().contains(&needle))
                    .unwrap_or(false)
                    || inv
                        .status
                        .as_deref()
                        .map(|st| st.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || inv
                        .created_user
                        .as_ref()
                        .map(|u| u.display_name().to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn page(&self) -> Vec<InvoiceRecord> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).iter().map(|inv| (*inv).clone()).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
