//! Lenient deserializers for the loosely typed upstream feed.
//!
//! The analytics service serves whatever its source spreadsheets contain:
//! numbers may arrive as strings, dates in more than one layout, and any
//! field may be missing. Records normalize on the way in so the rest of
//! the engine never deals with absent values.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::stock::StockStatus;

/// Accepted datetime layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Number, numeric string, null, or missing; anything unparseable is zero.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(decimal_from_value(value.as_ref()))
}

pub(crate) fn decimal_from_value(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Status string or anything else; unrecognized values become `Unknown`.
pub fn lenient_status<'de, D>(deserializer: D) -> Result<StockStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(StockStatus::parse)
        .unwrap_or_default())
}

/// Empty or missing selections mean "no status filter".
pub fn lenient_status_filter<'de, D>(deserializer: D) -> Result<Option<StockStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(StockStatus::parse))
}

/// Datetime string in any accepted layout; unparseable values become `None`.
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_datetime))
}

pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    // A bare date still places the record on the trend axis
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_number_and_string() {
        assert_eq!(
            decimal_from_value(Some(&json!(10.5))),
            Decimal::new(105, 1)
        );
        assert_eq!(
            decimal_from_value(Some(&json!("42.25"))),
            Decimal::new(4225, 2)
        );
    }

    #[test]
    fn test_decimal_from_garbage_is_zero() {
        assert_eq!(decimal_from_value(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(decimal_from_value(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(decimal_from_value(None), Decimal::ZERO);
        assert_eq!(decimal_from_value(Some(&json!([1, 2]))), Decimal::ZERO);
    }

    #[test]
    fn test_parse_datetime_layouts() {
        assert!(parse_datetime("2025-03-01 08:30:00").is_some());
        assert!(parse_datetime("2025-03-01T08:30:00").is_some());
        assert!(parse_datetime("2025-03-01T08:30:00.123").is_some());
        assert!(parse_datetime("2025-03-01").is_some());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }
}
