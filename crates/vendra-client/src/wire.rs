//! # Wire Conversions
//!
//! The ERP exchanges decimal amounts and occasionally stringly-typed
//! numbers; the rest of the workspace uses integer cents and basis points.
//! Every conversion between the two worlds lives in this module, so the
//! core stays float-free.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use vendra_core::Money;

// =============================================================================
// Decimal <-> Cents
// =============================================================================

/// Converts a wire decimal amount (e.g. `123.45`) to cents.
/// Round-half-away at two decimals.
pub fn cents_from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Converts cents back to the wire decimal representation.
pub fn decimal_from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn money_from_decimal(amount: f64) -> Money {
    Money::from_cents(cents_from_decimal(amount))
}

pub fn decimal_from_money(money: Money) -> f64 {
    decimal_from_cents(money.cents())
}

// =============================================================================
// Percent <-> Basis Points
// =============================================================================

/// Converts a wire percentage (e.g. `10` meaning 10%) to basis points.
/// Negative wire values clamp to zero.
pub fn bps_from_percent(percent: f64) -> u32 {
    let bps = (percent * 100.0).round();
    if bps.is_finite() && bps > 0.0 {
        bps as u32
    } else {
        0
    }
}

/// Converts basis points back to the wire percentage.
pub fn percent_from_bps(bps: u32) -> f64 {
    bps as f64 / 100.0
}

// =============================================================================
// Lenient Value Coercion
// =============================================================================

/// Reads an integer out of a JSON value that may be a number, a numeric
/// string, or a float.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .or_else(|| value.as_f64().map(|f| f as i64))
}

/// Reads a float out of a JSON value that may be a number or a numeric
/// string.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

// =============================================================================
// Lenient Deserializers
// =============================================================================
// Wire records use these with `#[serde(default, deserialize_with = ...)]`
// so a weirdly typed field degrades to None instead of failing the row.

pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_i64(&value))
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

/// Deserializes a nested record if it is the expected shape, `None` for
/// anything else (some backends put a bare id or a display string where an
/// object belongs).
pub fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_cents_round_trip() {
        assert_eq!(cents_from_decimal(123.45), 12345);
        assert_eq!(cents_from_decimal(0.1 + 0.2), 30);
        assert_eq!(decimal_from_cents(12345), 123.45);
    }

    #[test]
    fn test_percent_bps_round_trip() {
        assert_eq!(bps_from_percent(10.0), 1000);
        assert_eq!(bps_from_percent(8.25), 825);
        assert_eq!(bps_from_percent(-5.0), 0);
        assert_eq!(percent_from_bps(825), 8.25);
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(value_as_i64(&json!(7)), Some(7));
        assert_eq!(value_as_i64(&json!("7")), Some(7));
        assert_eq!(value_as_i64(&json!(" 7 ")), Some(7));
        assert_eq!(value_as_i64(&json!(7.9)), Some(7));
        assert_eq!(value_as_i64(&json!("x")), None);
        assert_eq!(value_as_i64(&json!(null)), None);
    }

    #[test]
    fn test_value_as_f64() {
        assert_eq!(value_as_f64(&json!(1.5)), Some(1.5));
        assert_eq!(value_as_f64(&json!("1.5")), Some(1.5));
        assert_eq!(value_as_f64(&json!({})), None);
    }
}
