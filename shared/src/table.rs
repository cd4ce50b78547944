//! Tabular stock view engine: filtering, sorting, and CSV export.
//!
//! Every function returns new data and leaves its input untouched; the
//! caller owns the authoritative record sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{de, StockRecord, StockStatus};

/// Export header, in the fixed column order.
pub const EXPORT_COLUMNS: [&str; 10] = [
    "SKU",
    "Product",
    "Category",
    "Quantity",
    "Reorder_Level",
    "Unit_Price",
    "Total_Value",
    "Stock_Status",
    "Warehouse",
    "Supplier",
];

/// Filter criteria for the stock table. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableFilter {
    /// Case-insensitive substring matched against product, SKU, and category.
    pub search_term: String,
    #[serde(deserialize_with = "de::lenient_status_filter")]
    pub status_filter: Option<StockStatus>,
    /// Exact warehouse name; empty selects all warehouses.
    pub warehouse_filter: String,
}

impl TableFilter {
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.status_filter.is_none()
            && self.warehouse_filter.is_empty()
    }
}

/// Sortable columns, addressed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockField {
    Sku,
    Product,
    Category,
    Quantity,
    ReorderLevel,
    UnitPrice,
    TotalValue,
    StockStatus,
    Warehouse,
    Supplier,
}

impl StockField {
    pub fn parse(name: &str) -> Option<StockField> {
        match name {
            "SKU" => Some(StockField::Sku),
            "Product" => Some(StockField::Product),
            "Category" => Some(StockField::Category),
            "Quantity" => Some(StockField::Quantity),
            "Reorder_Level" => Some(StockField::ReorderLevel),
            "Unit_Price" => Some(StockField::UnitPrice),
            "Total_Value" => Some(StockField::TotalValue),
            "Stock_Status" => Some(StockField::StockStatus),
            "Warehouse" => Some(StockField::Warehouse),
            "Supplier" => Some(StockField::Supplier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockField::Sku => "SKU",
            StockField::Product => "Product",
            StockField::Category => "Category",
            StockField::Quantity => "Quantity",
            StockField::ReorderLevel => "Reorder_Level",
            StockField::UnitPrice => "Unit_Price",
            StockField::TotalValue => "Total_Value",
            StockField::StockStatus => "Stock_Status",
            StockField::Warehouse => "Warehouse",
            StockField::Supplier => "Supplier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<SortDirection> {
        match raw {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("CSV serialization error: {0}")]
    Serialize(String),
    #[error("CSV writer error: {0}")]
    Writer(String),
}

/// Keep records matching all three criteria.
pub fn filter(records: &[StockRecord], criteria: &TableFilter) -> Vec<StockRecord> {
    let term = criteria.search_term.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            let text_match = term.is_empty()
                || record.product.to_lowercase().contains(&term)
                || record.sku.to_lowercase().contains(&term)
                || record.category.to_lowercase().contains(&term);
            let status_match = criteria
                .status_filter
                .map_or(true, |status| record.stock_status == status);
            let warehouse_match = criteria.warehouse_filter.is_empty()
                || record.warehouse == criteria.warehouse_filter;
            text_match && status_match && warehouse_match
        })
        .cloned()
        .collect()
}

/// Stable single-key sort. A new call replaces any prior ordering.
pub fn sort(
    records: &[StockRecord],
    field: StockField,
    direction: SortDirection,
) -> Vec<StockRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_field(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare_field(a: &StockRecord, b: &StockRecord, field: StockField) -> std::cmp::Ordering {
    match field {
        StockField::Sku => a.sku.cmp(&b.sku),
        StockField::Product => a.product.cmp(&b.product),
        StockField::Category => a.category.cmp(&b.category),
        StockField::Quantity => a.quantity.cmp(&b.quantity),
        StockField::ReorderLevel => a.reorder_level.cmp(&b.reorder_level),
        StockField::UnitPrice => a.unit_price.cmp(&b.unit_price),
        StockField::TotalValue => a.total_value.cmp(&b.total_value),
        StockField::StockStatus => a.stock_status.as_str().cmp(b.stock_status.as_str()),
        StockField::Warehouse => a.warehouse.cmp(&b.warehouse),
        StockField::Supplier => a.supplier.cmp(&b.supplier),
    }
}

/// Serialize records to CSV with every field quoted and the fixed header.
///
/// The header is written even for an empty record set.
pub fn export_csv(records: &[StockRecord]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(vec![]);

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| ExportError::Serialize(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Writer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Writer(e.to_string()))
}

/// Download name carrying the export date.
pub fn export_filename(date: NaiveDate) -> String {
    format!("inventory_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Distinct warehouses in first-occurrence order, for the filter control.
pub fn warehouse_options(records: &[StockRecord]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for record in records {
        if record.warehouse.is_empty() {
            continue;
        }
        if !options.iter().any(|w| w == &record.warehouse) {
            options.push(record.warehouse.clone());
        }
    }
    options
}

/// Status line under the table.
pub fn visible_summary(shown: usize, total: usize) -> String {
    format!("Showing {} of {} products", shown, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(sku: &str, product: &str, warehouse: &str) -> StockRecord {
        StockRecord {
            sku: sku.to_string(),
            product: product.to_string(),
            category: "Hardware".to_string(),
            quantity: Decimal::from(10),
            reorder_level: Decimal::from(5),
            unit_price: Decimal::new(150, 2),
            total_value: Decimal::from(15),
            stock_status: StockStatus::Adequate,
            warehouse: warehouse.to_string(),
            supplier: "Acme".to_string(),
        }
    }

    #[test]
    fn test_field_parse_round_trip() {
        for name in EXPORT_COLUMNS {
            let field = StockField::parse(name).unwrap();
            assert_eq!(field.as_str(), name);
        }
        assert!(StockField::parse("Price").is_none());
        assert!(StockField::parse("sku").is_none());
    }

    #[test]
    fn test_search_matches_product_sku_and_category() {
        let records = vec![
            record("SKU-001", "Steel Bolt", "W1"),
            record("BOLT-77", "Washer", "W1"),
            record("SKU-002", "Hinge", "W2"),
        ];
        let criteria = TableFilter {
            search_term: "bolt".to_string(),
            ..TableFilter::default()
        };
        let kept = filter(&records, &criteria);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].sku, "SKU-001");
        assert_eq!(kept[1].sku, "BOLT-77");
    }

    #[test]
    fn test_filter_criteria_combine_with_and() {
        let mut stocked = record("SKU-003", "Bolt Cutter", "W2");
        stocked.stock_status = StockStatus::Low;
        let records = vec![record("SKU-001", "Steel Bolt", "W1"), stocked];
        let criteria = TableFilter {
            search_term: "bolt".to_string(),
            status_filter: Some(StockStatus::Low),
            warehouse_filter: "W2".to_string(),
        };
        let kept = filter(&records, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sku, "SKU-003");
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = vec![record("A", "P1", "W1"), record("B", "P2", "W2")];
        assert_eq!(filter(&records, &TableFilter::default()), records);
        assert!(TableFilter::default().is_empty());
    }

    #[test]
    fn test_sort_descending_reverses_ascending() {
        let records = vec![record("B", "P1", "W1"), record("A", "P2", "W1")];
        let asc = sort(&records, StockField::Sku, SortDirection::Ascending);
        let desc = sort(&records, StockField::Sku, SortDirection::Descending);
        assert_eq!(asc[0].sku, "A");
        assert_eq!(desc[0].sku, "B");
    }

    #[test]
    fn test_export_header_present_for_empty_set() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "\"SKU\",\"Product\",\"Category\",\"Quantity\",\"Reorder_Level\",\"Unit_Price\",\"Total_Value\",\"Stock_Status\",\"Warehouse\",\"Supplier\"\n"
        );
    }

    #[test]
    fn test_export_quotes_every_field() {
        let csv = export_csv(&[record("SKU-001", "Steel Bolt", "W1")]).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "\"SKU-001\",\"Steel Bolt\",\"Hardware\",\"10\",\"5\",\"1.50\",\"15\",\"Adequate\",\"W1\",\"Acme\""
        );
    }

    #[test]
    fn test_export_filename_carries_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "inventory_export_2024-03-09.csv");
    }

    #[test]
    fn test_warehouse_options_distinct_in_order() {
        let records = vec![
            record("A", "P", "West"),
            record("B", "P", ""),
            record("C", "P", "East"),
            record("D", "P", "West"),
        ];
        assert_eq!(warehouse_options(&records), vec!["West", "East"]);
    }

    #[test]
    fn test_visible_summary_text() {
        assert_eq!(visible_summary(3, 10), "Showing 3 of 10 products");
    }
}
