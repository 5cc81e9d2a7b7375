//! # Customer Directory
//!
//! List/search/select/create customers. The listing is fetched once
//! (up to the listing cap), then filtered and paged locally: the search
//! box matches the id, the joined name, address, telephone, and
//! description, case-insensitively.

use std::sync::Arc;

use tracing::warn;

use vendra_client::identity::IdentityProvider;
use vendra_client::{ApiClient, CustomerRecord, NewCustomer};
use vendra_core::paging::Pager;
use vendra_core::validation::{validate_customer_name, validate_telephone};
use vendra_core::CoreError;

use crate::error::WorkflowResult;
use crate::session::Session;

/// Rows fetched for the local directory listing.
const LISTING_CAP: u32 = 1000;

/// Fields captured by the create-customer form.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub telephone: String,
    pub description: String,
}

pub struct CustomerDirectory {
    client: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    session: Session,
    customers: Vec<CustomerRecord>,
    search: String,
    pub pager: Pager,
}

impl CustomerDirectory {
    pub fn new(client: ApiClient, identity: Arc<dyn IdentityProvider>, session: Session) -> Self {
        CustomerDirectory {
            client,
            identity,
            session,
            customers: Vec::new(),
            search: String::new(),
            pager: Pager::default(),
        }
    }

    /// Loads the directory. A failed read degrades to an empty listing;
    /// the view shows "no customers found" rather than an error screen.
    pub async fn load(&mut self) {
        match self.client.customers().list(1, LISTING_CAP, "").await {
            Ok(customers) => self.customers = customers,
            Err(e) => {
                warn!(error = %e, "failed to load customers");
                self.customers = Vec::new();
            }
        }
        self.pager.reset();
    }

    /// Updates the search text; the page resets to 1.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.pager.reset();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// All rows matching the current search, in listing order.
    pub fn filtered(&self) -> Vec<&CustomerRecord> {
        let needle = self.search.to_lowercase();
        self.customers
            .iter()
            .filter(|c| matches_customer(c, &needle))
            .collect()
    }

    /// The rows visible on the current page.
    pub fn page(&self) -> Vec<CustomerRecord> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).iter().map(|c| (*c).clone()).collect()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    /// Creates a customer. `added_by` resolves from the token identity,
    /// then the cached login user id, then 1.
    pub async fn create(&self, form: &CustomerForm) -> WorkflowResult<CustomerRecord> {
        validate_customer_name("first_name", &form.first_name).map_err(CoreError::from)?;
        validate_customer_name("last_name", &form.last_name).map_err(CoreError::from)?;
        validate_telephone(&form.telephone).map_err(CoreError::from)?;

        let added_by = self
            .identity
            .current_user_id()
            .or_else(|| self.session.stored_user_id())
            .unwrap_or(1);

        let payload = NewCustomer {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            middle_name: non_empty(&form.middle_name),
            address: non_empty(&form.address),
            telephone: non_empty(&form.telephone),
            description: non_empty(&form.description),
            added_by,
        };

        Ok(self.client.customers().create(&payload).await?)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn matches_customer(customer: &CustomerRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if let Some(id) = customer.id {
        if id.to_string().contains(needle) {
            return true;
        }
    }
    if customer.display_name().to_lowercase().contains(needle) {
        return true;
    }
    [
        &customer.address,
        &customer.telephone,
        &customer.description,
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, first: &str, last: &str, telephone: Option<&str>) -> CustomerRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "first_name": first,
            "last_name": last,
            "telephone": telephone,
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_matches_across_fields() {
        let rows = vec![
            record(1, "Nimal", "Perera", Some("0771234567")),
            record(2, "Kamal", "Silva", None),
            record(23, "Ruwan", "Fernando", None),
        ];

        let hits: Vec<_> = rows
            .iter()
            .filter(|c| matches_customer(c, "silva"))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, Some(2));

        // Id substring match, the way the search box has always worked.
        let hits: Vec<_> = rows.iter().filter(|c| matches_customer(c, "2")).collect();
        assert_eq!(hits.len(), 2);

        let hits: Vec<_> = rows
            .iter()
            .filter(|c| matches_customer(c, "0771"))
            .collect();
        assert_eq!(hits.len(), 1);

        // Empty search matches everything.
        assert!(rows.iter().all(|c| matches_customer(c, "")));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  x  ").as_deref(), Some("x"));
        assert_eq!(non_empty("   "), None);
    }
}
