//! # Product Lookup and Stock Overview
//!
//! The product-selection flow behind "Add Items To Invoice", and the
//! read-only stock listing.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Product Lookup                                     │
//! │                                                                         │
//! │  mount ──► load_outlet_stocks()    one read per outlet, indexed by     │
//! │                │                   item id, outlet name remembered     │
//! │                ▼                                                        │
//! │  search ──► search_items(q)        server-side name filter             │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  select ──► select_item(id)        stock row must exist in outlet;     │
//! │                │                   price = stock_price → retail →      │
//! │                │                   selling → 0                          │
//! │                ▼                                                        │
//! │  add ──► build_line(qty, price)    optimistic qty <= available check,  │
//! │                                    then the caller adds it to the draft │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The availability check here is optimistic only; the ERP re-validates at
//! invoice-item creation.

use std::collections::HashMap;

use tracing::warn;

use vendra_client::{ApiClient, ItemRecord, StockRecord};
use vendra_core::draft::parse_line_quantity;
use vendra_core::paging::Pager;
use vendra_core::{CoreError, CoreResult, DraftItem, Money};

use crate::session::Session;

/// Page size of the stock-walk reads.
const STOCK_WALK_PAGE_SIZE: u32 = 200;

/// Page cap on the stock walk, same rationale as the customer walk.
const STOCK_WALK_MAX_PAGES: u32 = 50;

// =============================================================================
// Product Lookup
// =============================================================================

/// A selected product, priced and bounded by its outlet stock row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSelection {
    pub item_id: i64,
    pub stock_id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub available: i64,
    pub unit_price: Money,
}

pub struct ProductLookup {
    client: ApiClient,
    session: Session,
    items: Vec<ItemRecord>,
    stocks_by_item: HashMap<i64, StockRecord>,
    outlet_id: i64,
    outlet_name: Option<String>,
    pub pager: Pager,
}

impl ProductLookup {
    pub fn new(client: ApiClient, session: Session) -> Self {
        let outlet_id = session.outlet_id();
        ProductLookup {
            client,
            session,
            items: Vec::new(),
            stocks_by_item: HashMap::new(),
            outlet_id,
            outlet_name: None,
            pager: Pager::default(),
        }
    }

    /// Loads the stock rows for the configured outlet and indexes them by
    /// item id. The outlet display name comes from the first row carrying
    /// one. A failed read degrades to an empty index.
    pub async fn load_outlet_stocks(&mut self) {
        self.outlet_id = self.session.outlet_id();
        match self.client.store().stocks_by_outlet(self.outlet_id).await {
            Ok(stocks) => {
                let mut index = HashMap::new();
                let mut outlet_name = None;
                for stock in stocks {
                    if outlet_name.is_none() {
                        outlet_name = stock.outlet_display_name();
                    }
                    if let Some(item_id) = stock.item_id {
                        index.insert(item_id, stock);
                    }
                }
                self.stocks_by_item = index;
                self.outlet_name = outlet_name;
            }
            Err(e) => {
                warn!(outlet_id = self.outlet_id, error = %e, "failed to load outlet stocks");
                self.stocks_by_item = HashMap::new();
            }
        }
    }

    /// Searches the catalog server-side by name. The page resets to 1.
    pub async fn search_items(&mut self, search: &str) {
        let query = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim())
        };
        match self.client.store().items(query).await {
            Ok(items) => self.items = items,
            Err(e) => {
                warn!(error = %e, "failed to load items");
                self.items = Vec::new();
            }
        }
        self.pager.reset();
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// The rows visible on the current page.
    pub fn page(&self) -> &[ItemRecord] {
        self.pager.slice(&self.items)
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.items.len())
    }

    /// Outlet name for the listing column, when any stock row named one.
    pub fn outlet_name(&self) -> Option<&str> {
        self.outlet_name.as_deref()
    }

    /// Outlet name for a specific row, falling back to the general one.
    pub fn outlet_name_for(&self, item_id: i64) -> Option<String> {
        self.stocks_by_item
            .get(&item_id)
            .and_then(StockRecord::outlet_display_name)
            .or_else(|| self.outlet_name.clone())
    }

    /// Selects an item, resolving its stock row in the current outlet.
    pub fn select_item(&self, item: &ItemRecord) -> CoreResult<ProductSelection> {
        let item_id = item.id.unwrap_or(0);
        let stock = self
            .stocks_by_item
            .get(&item_id)
            .ok_or(CoreError::StockNotFound {
                item_id,
                outlet_id: self.outlet_id,
            })?;
        let stock_id = stock.id.ok_or(CoreError::StockNotFound {
            item_id,
            outlet_id: self.outlet_id,
        })?;

        Ok(ProductSelection {
            item_id,
            stock_id,
            sku: item.sku.clone().unwrap_or_default(),
            name: item.name.clone().unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            available: stock.available(),
            unit_price: stock.unit_price(),
        })
    }

    /// Builds the draft line for a selection, applying the optimistic
    /// stock pre-check. `price` overrides the stock price when the cashier
    /// edited it.
    pub fn build_line(
        selection: &ProductSelection,
        quantity_text: &str,
        price: Option<Money>,
    ) -> CoreResult<DraftItem> {
        let quantity = parse_line_quantity(quantity_text);
        if quantity > selection.available {
            return Err(CoreError::InsufficientStock {
                sku: selection.sku.clone(),
                available: selection.available,
                requested: quantity,
            });
        }

        Ok(DraftItem {
            stock_id: selection.stock_id,
            item_id: selection.item_id,
            sku: selection.sku.clone(),
            name: selection.name.clone(),
            description: selection.description.clone(),
            unit_price: price.unwrap_or(selection.unit_price),
            quantity,
        })
    }
}

// =============================================================================
// Stock Overview
// =============================================================================

/// The read-only stock listing: walks the whole stock table, filters
/// locally on name/SKU/description, pages at 20 rows.
pub struct StockOverview {
    client: ApiClient,
    stocks: Vec<StockRecord>,
    search: String,
    pub pager: Pager,
}

impl StockOverview {
    /// Rows per page of the overview listing.
    pub const PAGE_SIZE: usize = 20;

    pub fn new(client: ApiClient) -> Self {
        StockOverview {
            client,
            stocks: Vec::new(),
            search: String::new(),
            pager: Pager::new(Self::PAGE_SIZE),
        }
    }

    /// Walks the stock table page by page until a short page or the cap.
    pub async fn load_all(&mut self) {
        let mut all = Vec::new();
        let mut skip = 0;
        for _ in 0..STOCK_WALK_MAX_PAGES {
            match self.client.store().stocks_page(STOCK_WALK_PAGE_SIZE, skip).await {
                Ok(page) => {
                    let count = page.len() as u32;
                    all.extend(page);
                    if count < STOCK_WALK_PAGE_SIZE {
                        break;
                    }
                    skip += STOCK_WALK_PAGE_SIZE;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load stocks");
                    all.clear();
                    break;
                }
            }
        }
        self.stocks = all;
        self.pager.reset();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.pager.reset();
    }

    /// Rows matching the search, by item name, SKU, or description.
    pub fn filtered(&self) -> Vec<&StockRecord> {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return self.stocks.iter().collect();
        }
        self.stocks
            .iter()
            .filter(|s| {
                field_contains(&s.name, &needle)
                    || field_contains(&s.sku, &needle)
                    || field_contains(&s.description, &needle)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn page(&self) -> Vec<StockRecord> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).iter().map(|s| (*s).clone()).collect()
    }
}

fn field_contains(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(available: i64, price_cents: i64) -> ProductSelection {
        ProductSelection {
            item_id: 7,
            stock_id: 31,
            sku: "RICE-5KG".into(),
            name: "Rice 5kg".into(),
            description: "white".into(),
            available,
            unit_price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_build_line_applies_stock_check() {
        let err = ProductLookup::build_line(&selection(3, 12550), "5", None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_build_line_quantity_coercion() {
        // Unparsable quantity coerces to 1 and passes a 1-unit check.
        let line = ProductLookup::build_line(&selection(1, 12550), "abc", None).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price.cents(), 12550);
    }

    #[test]
    fn test_build_line_price_override() {
        let line =
            ProductLookup::build_line(&selection(10, 12550), "2", Some(Money::from_cents(9900)))
                .unwrap();
        assert_eq!(line.unit_price.cents(), 9900);
        assert_eq!(line.stock_id, 31);
        assert_eq!(line.item_id, 7);
    }
}
