//! # Response Envelope Normalization
//!
//! The ERP's response envelopes are inconsistently shaped across endpoints:
//! sometimes a bare array, sometimes `{ data: [...] }`, sometimes nested one
//! level deeper, sometimes keyed by a collection name. Rather than probing
//! shapes at every call site, this module resolves the envelope once at the
//! boundary.
//!
//! ## Shapes Tried, In Order
//! ```text
//! Lists (unwrap_list, with optional collection name "customers"):
//!   1. [ ... ]
//!   2. { "data": [ ... ] }
//!   3. { "data": { "data": [ ... ] } }
//!   4. { "customers": [ ... ] }
//!   5. { "data": { "customers": [ ... ] } }
//!   6. { "anything": [ ... ] }      first array-valued field, last resort
//!
//! Objects (unwrap_object):
//!   1. { "data": { "data": { ... } } }
//!   2. { "data": { ... } }
//!   3. { ... }
//! ```
//!
//! A miss yields an empty list / the value itself, never an error; the
//! caller decides whether an empty result matters.

use serde_json::Value;

/// Extracts the list payload from a response envelope.
///
/// `collection` is the endpoint's plural name, used for shapes 4 and 5.
pub fn unwrap_list(value: &Value, collection: Option<&str>) -> Vec<Value> {
    if let Some(rows) = value.as_array() {
        return rows.clone();
    }

    if let Some(data) = value.get("data") {
        if let Some(rows) = data.as_array() {
            return rows.clone();
        }
        if let Some(rows) = data.get("data").and_then(Value::as_array) {
            return rows.clone();
        }
    }

    if let Some(name) = collection {
        if let Some(rows) = value.get(name).and_then(Value::as_array) {
            return rows.clone();
        }
        if let Some(rows) = value
            .get("data")
            .and_then(|d| d.get(name))
            .and_then(Value::as_array)
        {
            return rows.clone();
        }
    }

    // Last resort: the first array-valued field of the object.
    if let Some(object) = value.as_object() {
        for field in object.values() {
            if let Some(rows) = field.as_array() {
                return rows.clone();
            }
        }
    }

    Vec::new()
}

/// Extracts the object payload from a response envelope:
/// `data.data`, then `data`, then the value itself.
pub fn unwrap_object(value: &Value) -> Value {
    if let Some(data) = value.get("data") {
        if let Some(inner) = data.get("data") {
            if inner.is_object() {
                return inner.clone();
            }
        }
        if data.is_object() {
            return data.clone();
        }
    }
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let value = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(unwrap_list(&value, None).len(), 2);
    }

    #[test]
    fn test_data_array() {
        let value = json!({"data": [{"id": 1}]});
        assert_eq!(unwrap_list(&value, None).len(), 1);
    }

    #[test]
    fn test_double_nested_data() {
        let value = json!({"data": {"data": [{"id": 1}, {"id": 2}, {"id": 3}]}});
        assert_eq!(unwrap_list(&value, None).len(), 3);
    }

    #[test]
    fn test_named_collection() {
        let value = json!({"customers": [{"id": 1}]});
        assert_eq!(unwrap_list(&value, Some("customers")).len(), 1);

        let nested = json!({"data": {"customers": [{"id": 1}, {"id": 2}]}});
        assert_eq!(unwrap_list(&nested, Some("customers")).len(), 2);
    }

    #[test]
    fn test_first_array_field_fallback() {
        let value = json!({"meta": 3, "rows": [{"id": 1}]});
        assert_eq!(unwrap_list(&value, None).len(), 1);
    }

    #[test]
    fn test_miss_yields_empty() {
        assert!(unwrap_list(&json!({"count": 0}), Some("invoices")).is_empty());
        assert!(unwrap_list(&Value::Null, None).is_empty());
    }

    #[test]
    fn test_unwrap_object_priority() {
        let double = json!({"data": {"data": {"id": 7}}});
        assert_eq!(unwrap_object(&double)["id"], 7);

        let single = json!({"data": {"id": 8}});
        assert_eq!(unwrap_object(&single)["id"], 8);

        let flat = json!({"id": 9});
        assert_eq!(unwrap_object(&flat)["id"], 9);
    }
}
