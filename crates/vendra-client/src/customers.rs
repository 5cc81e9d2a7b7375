//! # Customer Endpoints
//!
//! List/search/create/update customers, plus the page-walking fetch-all
//! helper the recall view uses to resolve customer names for invoices that
//! arrive without an embedded customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use vendra_core::Customer;

use crate::envelope;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::wire::lenient_i64;

/// Page size used when walking the whole customer list.
const FETCH_ALL_PAGE_SIZE: u32 = 200;

/// Hard ceiling on fetch-all pages. 10,000 customers is far beyond any
/// single-outlet deployment; the cap exists so a misbehaving backend that
/// repeats pages cannot loop us forever.
const FETCH_ALL_MAX_PAGES: u32 = 50;

// =============================================================================
// Wire Records
// =============================================================================

/// A customer row as the ERP returns it. Field names vary across backend
/// versions, hence the aliases; numbers may arrive as strings, hence the
/// lenient id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRecord {
    #[serde(
        default,
        alias = "customer_id",
        alias = "customerId",
        deserialize_with = "lenient_i64"
    )]
    pub id: Option<i64>,

    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,

    #[serde(default, alias = "middleName")]
    pub middle_name: Option<String>,

    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,

    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,

    /// Some backends collapse the name parts into a single field.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub telephone: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub added_by: Option<i64>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

impl CustomerRecord {
    /// Best display name this record can produce:
    /// `full_name`/`name`, then joined name parts, then `Customer <id>`.
    pub fn display_name(&self) -> String {
        if let Some(full) = non_blank(&self.full_name).or_else(|| non_blank(&self.name)) {
            return full;
        }

        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();
        if !joined.is_empty() {
            return joined;
        }

        match self.id {
            Some(id) => format!("Customer {}", id),
            None => "Customer".to_string(),
        }
    }

    /// Converts to the domain type. Rows without an id are unusable.
    pub fn into_domain(self) -> Option<Customer> {
        let id = self.id?;
        let first_name = non_blank(&self.first_name)
            .or_else(|| non_blank(&self.name))
            .unwrap_or_default();
        Some(Customer {
            id,
            first_name,
            middle_name: self.middle_name,
            last_name: self.last_name.unwrap_or_default(),
            address: self.address,
            telephone: self.telephone,
            description: self.description,
            added_by: self.added_by,
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// =============================================================================
// Create Payload
// =============================================================================

/// Payload for `POST /pos/customer`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User id of the cashier creating the record.
    pub added_by: i64,
}

// =============================================================================
// Endpoint Wrapper
// =============================================================================

/// Customer endpoint wrapper. Obtained via [`ApiClient::customers`].
pub struct CustomersApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl CustomersApi<'_> {
    /// `GET /pos/customers` with server-side paging and search.
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> ClientResult<Vec<CustomerRecord>> {
        let response = self
            .client
            .get(
                "/pos/customers",
                &[
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                    ("search", search.to_string()),
                ],
            )
            .await?;
        Ok(parse_rows(&response, "customers"))
    }

    /// Walks every page of the customer list.
    ///
    /// Stops on an empty page, a short page, or the page cap.
    pub async fn fetch_all(&self) -> ClientResult<Vec<CustomerRecord>> {
        let mut all = Vec::new();
        for page in 1..=FETCH_ALL_MAX_PAGES {
            let rows = self.list(page, FETCH_ALL_PAGE_SIZE, "").await?;
            let count = rows.len();
            all.extend(rows);
            if count == 0 || (count as u32) < FETCH_ALL_PAGE_SIZE {
                break;
            }
        }
        debug!(total = all.len(), "fetched full customer list");
        Ok(all)
    }

    /// `POST /pos/customer`.
    pub async fn create(&self, new: &NewCustomer) -> ClientResult<CustomerRecord> {
        let body = serde_json::to_value(new)?;
        let response = self.client.post("/pos/customer", &body).await?;
        let record = envelope::unwrap_object(&response);
        Ok(serde_json::from_value(record)?)
    }

    /// `PATCH /pos/customer/{id}` with an arbitrary field patch.
    pub async fn update(&self, id: i64, patch: &Value) -> ClientResult<Value> {
        self.client
            .patch(&format!("/pos/customer/{}", id), patch)
            .await
    }
}

/// Parses envelope rows into records, skipping rows that do not parse.
pub(crate) fn parse_rows<T: serde::de::DeserializeOwned>(
    response: &Value,
    collection: &str,
) -> Vec<T> {
    envelope::unwrap_list(response, Some(collection))
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection, error = %e, "skipping unparsable row");
                None
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
