//! # Catalog and Stock Endpoints
//!
//! Read-only views of the store: catalog items and per-outlet stock rows.
//! Stock truth lives server-side; these reads feed the optimistic
//! pre-check and the price fields of the product lookup.

use serde::Deserialize;

use vendra_core::{Item, Money, Stock};

use crate::customers::parse_rows;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::wire::{lenient_f64, lenient_i64, lenient_record, money_from_decimal};

// =============================================================================
// Wire Records
// =============================================================================

/// A catalog item row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub sub_category_id: Option<i64>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub other_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl ItemRecord {
    /// Converts to the domain type. Rows without an id are unusable.
    pub fn into_domain(self) -> Option<Item> {
        let id = self.id?;
        Some(Item {
            id,
            sub_category_id: self.sub_category_id,
            sku: self.sku.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            other_name: self.other_name,
            description: self.description,
            origin: self.origin,
            created_at: self
                .created_at
                .as_deref()
                .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc)),
        })
    }
}

/// The outlet embedded inside a stock row, when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutletRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A per-outlet stock row. The listing flattens the catalog fields (sku,
/// name, description) onto each row.
///
/// The selling price has drifted across backend versions; resolution order
/// is `stock_price`, then `retail_price`, then `selling_price`, then zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,

    #[serde(default, alias = "itemId", deserialize_with = "lenient_i64")]
    pub item_id: Option<i64>,

    #[serde(default, alias = "outletId", deserialize_with = "lenient_i64")]
    pub outlet_id: Option<i64>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub other_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub stock_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub retail_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub selling_price: Option<f64>,

    #[serde(default)]
    pub outlet_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_record")]
    pub outlet: Option<OutletRecord>,
}

impl StockRecord {
    /// Units on hand, floored to whole units.
    pub fn available(&self) -> i64 {
        self.quantity.unwrap_or(0.0) as i64
    }

    /// Selling price through the fallback chain.
    pub fn unit_price(&self) -> Money {
        let decimal = self
            .stock_price
            .or(self.retail_price)
            .or(self.selling_price)
            .unwrap_or(0.0);
        money_from_decimal(decimal)
    }

    /// Outlet display name: the flat field, then the embedded outlet.
    pub fn outlet_display_name(&self) -> Option<String> {
        self.outlet_name
            .clone()
            .or_else(|| self.outlet.as_ref().and_then(|o| o.name.clone()))
            .filter(|name| !name.trim().is_empty())
    }

    /// Converts to the domain type. Rows without id or item id are
    /// unusable.
    pub fn into_domain(self) -> Option<Stock> {
        let id = self.id?;
        let item_id = self.item_id?;
        Some(Stock {
            id,
            item_id,
            outlet_id: self.outlet_id.unwrap_or(0),
            quantity: self.available(),
            selling_price: self.unit_price(),
            outlet_name: self.outlet_display_name(),
        })
    }
}

// =============================================================================
// Endpoint Wrapper
// =============================================================================

/// Catalog/stock endpoint wrapper. Obtained via [`ApiClient::store`].
pub struct StoreApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl StoreApi<'_> {
    /// `GET /store/items`, optionally filtered by name server-side.
    pub async fn items(&self, name: Option<&str>) -> ClientResult<Vec<ItemRecord>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }
        let response = self.client.get("/store/items", &query).await?;
        Ok(parse_rows(&response, "items"))
    }

    /// `GET /store/stocks/{outletId}`.
    pub async fn stocks_by_outlet(&self, outlet_id: i64) -> ClientResult<Vec<StockRecord>> {
        let response = self
            .client
            .get(&format!("/store/stocks/{}", outlet_id), &[])
            .await?;
        Ok(parse_rows(&response, "stocks"))
    }

    /// `GET /store/stocks`, every outlet.
    pub async fn stocks(&self) -> ClientResult<Vec<StockRecord>> {
        let response = self.client.get("/store/stocks", &[]).await?;
        Ok(parse_rows(&response, "stocks"))
    }

    /// `GET /store/stocks` with take/skip paging, for walking the whole
    /// stock table page by page.
    pub async fn stocks_page(&self, take: u32, skip: u32) -> ClientResult<Vec<StockRecord>> {
        let response = self
            .client
            .get(
                "/store/stocks",
                &[("take", take.to_string()), ("skip", skip.to_string())],
            )
            .await?;
        Ok(parse_rows(&response, "stocks"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_fallback_chain() {
        let stock_price: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "stock_price": 120.0, "selling_price": 99.0
        }))
        .unwrap();
        assert_eq!(stock_price.unit_price().cents(), 12000);

        let retail: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "retail_price": "85.50"
        }))
        .unwrap();
        assert_eq!(retail.unit_price().cents(), 8550);

        let selling: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "selling_price": 70.0
        }))
        .unwrap();
        assert_eq!(selling.unit_price().cents(), 7000);

        let none: StockRecord =
            serde_json::from_value(json!({"id": 1, "item_id": 2})).unwrap();
        assert_eq!(none.unit_price().cents(), 0);
    }

    #[test]
    fn test_outlet_name_resolution() {
        let flat: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "outlet_name": "Main Street"
        }))
        .unwrap();
        assert_eq!(flat.outlet_display_name().as_deref(), Some("Main Street"));

        let embedded: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "outlet": { "id": 1, "name": "Warehouse" }
        }))
        .unwrap();
        assert_eq!(embedded.outlet_display_name().as_deref(), Some("Warehouse"));

        let neither: StockRecord =
            serde_json::from_value(json!({"id": 1, "item_id": 2})).unwrap();
        assert_eq!(neither.outlet_display_name(), None);
    }

    #[test]
    fn test_available_floors_fractional_quantities() {
        let stock: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "quantity": 7.8
        }))
        .unwrap();
        assert_eq!(stock.available(), 7);
    }

    #[test]
    fn test_into_domain_requires_ids() {
        let missing_item: StockRecord = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(missing_item.into_domain().is_none());

        let ok: StockRecord = serde_json::from_value(json!({
            "id": 1, "item_id": 2, "outlet_id": 3, "quantity": 10, "stock_price": 50.0
        }))
        .unwrap();
        let stock = ok.into_domain().unwrap();
        assert_eq!(stock.outlet_id, 3);
        assert_eq!(stock.selling_price.cents(), 5000);
    }

    #[test]
    fn test_item_record_into_domain() {
        let record: ItemRecord = serde_json::from_value(json!({
            "id": "12", "sku": "RICE-5KG", "name": "Rice 5kg"
        }))
        .unwrap();
        let item = record.into_domain().unwrap();
        assert_eq!(item.id, 12);
        assert_eq!(item.sku, "RICE-5KG");
    }
}
