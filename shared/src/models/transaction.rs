//! Transaction records used for trend aggregation.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;

/// One inventory movement.
///
/// Only the date and total value drive the dashboard; the remaining
/// upstream columns are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Movement timestamp; `None` when the feed value could not be parsed.
    #[serde(rename = "Date", default, deserialize_with = "de::lenient_datetime")]
    pub date: Option<NaiveDateTime>,

    /// "In" or "Out" on the upstream feed.
    #[serde(rename = "Type", default)]
    pub transaction_type: String,

    #[serde(rename = "Product", default)]
    pub product: String,

    #[serde(rename = "Product_ID", default)]
    pub product_id: Option<String>,

    #[serde(rename = "Warehouse", default)]
    pub warehouse: String,

    #[serde(rename = "Quantity", default, deserialize_with = "de::lenient_decimal")]
    pub quantity: Decimal,

    #[serde(rename = "Total_Value", default, deserialize_with = "de::lenient_decimal")]
    pub total_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_lenient_transaction_deserialization() {
        let raw = r#"{
            "Date": "2025-02-14 09:15:00",
            "Type": "Out",
            "Product": "Widget",
            "Total_Value": "150.75"
        }"#;
        let record: TransactionRecord = serde_json::from_str(raw).unwrap();
        let date = record.date.unwrap();
        assert_eq!(date.day(), 14);
        assert_eq!(date.hour(), 9);
        assert_eq!(record.total_value, Decimal::new(15075, 2));
        assert_eq!(record.product_id, None);
    }

    #[test]
    fn test_unparseable_date_becomes_none() {
        let raw = r#"{"Date": "last tuesday", "Total_Value": 10}"#;
        let record: TransactionRecord = serde_json::from_str(raw).unwrap();
        assert!(record.date.is_none());
    }
}
