//! Stock records and snapshot-level quick statistics.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;

/// One inventory line as served by the analytics backend.
///
/// Field names mirror the upstream columns. `total_value` is
/// authoritative and never recomputed from quantity and unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "SKU", default)]
    pub sku: String,

    #[serde(rename = "Product", default)]
    pub product: String,

    #[serde(rename = "Category", default)]
    pub category: String,

    #[serde(rename = "Quantity", default, deserialize_with = "de::lenient_decimal")]
    pub quantity: Decimal,

    #[serde(rename = "Reorder_Level", default, deserialize_with = "de::lenient_decimal")]
    pub reorder_level: Decimal,

    #[serde(rename = "Unit_Price", default, deserialize_with = "de::lenient_decimal")]
    pub unit_price: Decimal,

    #[serde(rename = "Total_Value", default, deserialize_with = "de::lenient_decimal")]
    pub total_value: Decimal,

    #[serde(rename = "Stock_Status", default, deserialize_with = "de::lenient_status")]
    pub stock_status: StockStatus,

    #[serde(rename = "Warehouse", default)]
    pub warehouse: String,

    #[serde(rename = "Supplier", default)]
    pub supplier: String,
}

/// Stock level classification attached by the analytics backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
    Overstocked,
    /// Anything the backend did not classify.
    #[default]
    Unknown,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical",
            StockStatus::Low => "Low",
            StockStatus::Adequate => "Adequate",
            StockStatus::Overstocked => "Overstocked",
            StockStatus::Unknown => "Unknown",
        }
    }

    /// Exact match against the wire value; anything else is `Unknown`.
    pub fn parse(raw: &str) -> StockStatus {
        match raw.trim() {
            "Critical" => StockStatus::Critical,
            "Low" => StockStatus::Low,
            "Adequate" => StockStatus::Adequate,
            "Overstocked" => StockStatus::Overstocked,
            _ => StockStatus::Unknown,
        }
    }

    /// Low or Critical, the two states that need attention.
    pub fn needs_reorder(&self) -> bool {
        matches!(self, StockStatus::Critical | StockStatus::Low)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Headline numbers for the overview strip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockStats {
    pub total_products: usize,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub critical_count: usize,
    pub warehouse_count: usize,
    pub supplier_count: usize,
}

impl StockStats {
    pub fn compute(records: &[StockRecord]) -> StockStats {
        let mut stats = StockStats {
            total_products: records.len(),
            ..StockStats::default()
        };
        let mut warehouses: HashSet<&str> = HashSet::new();
        let mut suppliers: HashSet<&str> = HashSet::new();

        for record in records {
            stats.total_quantity += record.quantity;
            stats.total_value += record.total_value;
            if record.stock_status.needs_reorder() {
                stats.low_stock_count += 1;
            }
            if record.stock_status == StockStatus::Critical {
                stats.critical_count += 1;
            }
            warehouses.insert(record.warehouse.as_str());
            suppliers.insert(record.supplier.as_str());
        }

        stats.warehouse_count = warehouses.len();
        stats.supplier_count = suppliers.len();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: StockStatus, warehouse: &str, supplier: &str) -> StockRecord {
        StockRecord {
            sku: "SKU-1".to_string(),
            product: "Widget".to_string(),
            category: "Hardware".to_string(),
            quantity: Decimal::from(10),
            reorder_level: Decimal::from(5),
            unit_price: Decimal::from(2),
            total_value: Decimal::from(20),
            stock_status: status,
            warehouse: warehouse.to_string(),
            supplier: supplier.to_string(),
        }
    }

    #[test]
    fn test_status_parse_exact() {
        assert_eq!(StockStatus::parse("Critical"), StockStatus::Critical);
        assert_eq!(StockStatus::parse("Overstocked"), StockStatus::Overstocked);
        assert_eq!(StockStatus::parse("critical"), StockStatus::Unknown);
        assert_eq!(StockStatus::parse(""), StockStatus::Unknown);
    }

    #[test]
    fn test_lenient_record_deserialization() {
        let raw = r#"{
            "SKU": "A1",
            "Product": "Bolt",
            "Quantity": "not a number",
            "Unit_Price": 1.25,
            "Stock_Status": "Surplus"
        }"#;
        let record: StockRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.sku, "A1");
        assert_eq!(record.category, "");
        assert_eq!(record.quantity, Decimal::ZERO);
        assert_eq!(record.unit_price, Decimal::new(125, 2));
        assert_eq!(record.stock_status, StockStatus::Unknown);
        assert_eq!(record.warehouse, "");
    }

    #[test]
    fn test_stats_counts() {
        let records = vec![
            record(StockStatus::Critical, "W1", "S1"),
            record(StockStatus::Low, "W1", "S2"),
            record(StockStatus::Adequate, "W2", "S1"),
        ];
        let stats = StockStats::compute(&records);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock_count, 2);
        assert_eq!(stats.critical_count, 1);
        assert_eq!(stats.warehouse_count, 2);
        assert_eq!(stats.supplier_count, 2);
        assert_eq!(stats.total_value, Decimal::from(60));
    }
}
