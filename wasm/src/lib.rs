//! WebAssembly module for the Stock Analytics Dashboard
//!
//! Client-side presentation logic for the browser shell:
//! - Stock table filtering, sorting, and CSV export
//! - Chart spec construction from snapshot data
//! - KPI value formatting, calculation narratives, related records
//! - Forecast result preparation

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::table::{SortDirection, StockField, TableFilter};
use shared::{charts, detail, format};
use shared::{ForecastResponse, KpiBundle, KpiId, StockRecord, StockStats, TransactionRecord};

// Re-export shared types for Rust consumers of this adapter
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_records(records_json: &str) -> Result<Vec<StockRecord>, JsValue> {
    serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid stock records JSON: {}", e)))
}

fn parse_kpis(kpis_json: &str) -> Result<KpiBundle, JsValue> {
    serde_json::from_str(kpis_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid KPI bundle JSON: {}", e)))
}

fn parse_payload(payload_json: &str) -> Result<serde_json::Value, JsValue> {
    serde_json::from_str(payload_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid KPI payload JSON: {}", e)))
}

fn parse_forecast(response_json: &str) -> Result<ForecastResponse, JsValue> {
    serde_json::from_str(response_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid forecast JSON: {}", e)))
}

fn parse_kpi_id(kpi_id: &str) -> Result<KpiId, JsValue> {
    kpi_id
        .parse()
        .map_err(|e: UnknownKpiId| JsValue::from_str(&e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn chart_or_message(result: charts::ChartResult) -> Result<String, JsValue> {
    match result {
        Ok(spec) => to_json(&spec),
        Err(no_data) => Err(JsValue::from_str(&no_data.0)),
    }
}

// ============================================================================
// Stock table
// ============================================================================

/// Filter stock records to those matching all criteria
#[wasm_bindgen]
pub fn filter_stock(records_json: &str, filter_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    let criteria: TableFilter = serde_json::from_str(filter_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter JSON: {}", e)))?;
    to_json(&shared::table::filter(&records, &criteria))
}

/// Sort stock records by column name ("Total_Value") and direction ("asc"/"desc")
#[wasm_bindgen]
pub fn sort_stock(records_json: &str, field: &str, direction: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    let field = StockField::parse(field)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown sort field: {}", field)))?;
    let direction = SortDirection::parse(direction)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown sort direction: {}", direction)))?;
    to_json(&shared::table::sort(&records, field, direction))
}

/// Export stock records as CSV text with every field quoted
#[wasm_bindgen]
pub fn export_stock_csv(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    shared::table::export_csv(&records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Export filename for a date given as YYYY-MM-DD
#[wasm_bindgen]
pub fn export_filename(date: &str) -> Result<String, JsValue> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date: {}", e)))?;
    Ok(shared::table::export_filename(date))
}

/// Distinct warehouse options in first-seen order
#[wasm_bindgen]
pub fn warehouse_options(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&shared::table::warehouse_options(&records))
}

/// "Showing X of Y products" table summary line
#[wasm_bindgen]
pub fn visible_summary(shown: usize, total: usize) -> String {
    shared::table::visible_summary(shown, total)
}

// ============================================================================
// Charts
// ============================================================================

/// Stock status pie chart
#[wasm_bindgen]
pub fn status_distribution_chart(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&charts::status_distribution(&records))
}

/// Quantity by category bar chart
#[wasm_bindgen]
pub fn category_quantity_chart(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&charts::category_quantity(&records))
}

/// Inventory value by warehouse bar chart
#[wasm_bindgen]
pub fn warehouse_value_chart(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&charts::warehouse_value(&records))
}

/// Top 10 products by value horizontal bar chart
#[wasm_bindgen]
pub fn top_products_chart(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&charts::top_products_by_value(&records))
}

/// Transaction value trend line chart
#[wasm_bindgen]
pub fn transaction_trends_chart(transactions_json: &str) -> Result<String, JsValue> {
    let transactions: Vec<TransactionRecord> = serde_json::from_str(transactions_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid transactions JSON: {}", e)))?;
    to_json(&charts::transaction_trends(&transactions))
}

/// Carrying cost breakdown chart. Throws the placeholder message when
/// the KPI payload carries no breakdown; the shell shows it in place
/// of the chart.
#[wasm_bindgen]
pub fn carrying_cost_chart(kpis_json: &str) -> Result<String, JsValue> {
    let kpis = parse_kpis(kpis_json)?;
    chart_or_message(charts::carrying_cost_breakdown(&kpis))
}

/// Supplier quality/value combo chart; throws the placeholder message
/// when the payload has no supplier map.
#[wasm_bindgen]
pub fn supplier_performance_chart(kpis_json: &str) -> Result<String, JsValue> {
    let kpis = parse_kpis(kpis_json)?;
    chart_or_message(charts::supplier_performance(&kpis))
}

/// Item count by age bucket chart
#[wasm_bindgen]
pub fn aging_count_chart(kpis_json: &str) -> Result<String, JsValue> {
    let kpis = parse_kpis(kpis_json)?;
    chart_or_message(charts::aging_item_counts(&kpis))
}

/// Inventory value by age bucket chart
#[wasm_bindgen]
pub fn aging_value_chart(kpis_json: &str) -> Result<String, JsValue> {
    let kpis = parse_kpis(kpis_json)?;
    chart_or_message(charts::aging_value(&kpis))
}

/// Forecast chart with confidence bounds
#[wasm_bindgen]
pub fn forecast_chart(response_json: &str) -> Result<String, JsValue> {
    let response = parse_forecast(response_json)?;
    to_json(&charts::forecast_chart(&response))
}

// ============================================================================
// KPI presentation
// ============================================================================

/// Headline value for a KPI, e.g. "12.5%" or "$4,000"
#[wasm_bindgen]
pub fn format_kpi_value(kpi_id: &str, payload_json: &str) -> Result<String, JsValue> {
    let id = parse_kpi_id(kpi_id)?;
    let payload = parse_payload(payload_json)?;
    Ok(detail::format_value(id, &payload))
}

/// Numbered calculation narrative for a KPI detail view
#[wasm_bindgen]
pub fn calculation_steps(
    kpi_id: &str,
    payload_json: &str,
    records_json: &str,
    cogs_ratio: f64,
) -> Result<String, JsValue> {
    let id = parse_kpi_id(kpi_id)?;
    let payload = parse_payload(payload_json)?;
    let records = parse_records(records_json)?;
    to_json(&detail::calculation_steps(id, &payload, &records, cogs_ratio))
}

/// Related records section of a KPI detail view
#[wasm_bindgen]
pub fn related_products(kpi_id: &str, records_json: &str) -> Result<String, JsValue> {
    let id = parse_kpi_id(kpi_id)?;
    let records = parse_records(records_json)?;
    to_json(&detail::related_records(id, &records))
}

/// Complete KPI detail view: title, value, narrative, related records
#[wasm_bindgen]
pub fn kpi_detail(
    kpi_id: &str,
    payload_json: &str,
    records_json: &str,
    cogs_ratio: f64,
) -> Result<String, JsValue> {
    let id = parse_kpi_id(kpi_id)?;
    let payload = parse_payload(payload_json)?;
    let records = parse_records(records_json)?;
    to_json(&detail::present(id, &payload, &records, cogs_ratio))
}

// ============================================================================
// Stats, forecast, formatting
// ============================================================================

/// Overview quick stats computed from stock records
#[wasm_bindgen]
pub fn quick_stats(records_json: &str) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(&StockStats::compute(&records))
}

/// Rounded forecast summary: total, average, peak, model, MAPE
#[wasm_bindgen]
pub fn forecast_summary(response_json: &str) -> Result<String, JsValue> {
    let response = parse_forecast(response_json)?;
    to_json(&response.summary())
}

/// Check a forecast horizon against the accepted choices
#[wasm_bindgen]
pub fn forecast_periods_valid(periods: u32) -> bool {
    validate_forecast_periods(periods).is_ok()
}

/// Format a value as whole-dollar currency, e.g. "$1,234,568"
#[wasm_bindgen]
pub fn format_currency(value: f64) -> String {
    format::currency(value)
}

/// Format a percentage with one decimal place, e.g. "12.5%"
#[wasm_bindgen]
pub fn format_percent(value: f64) -> String {
    format::percent(value)
}

/// Format a number trimming trailing zeros, e.g. "8.2"
#[wasm_bindgen]
pub fn format_number(value: f64) -> String {
    format::number(value)
}

/// Format a whole number with thousands separators, e.g. "1,250"
#[wasm_bindgen]
pub fn format_thousands(value: f64) -> String {
    format::thousands(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn records_json() -> String {
        serde_json::json!([
            {
                "SKU": "SKU-001",
                "Product": "Steel Bolt",
                "Category": "Hardware",
                "Quantity": 10,
                "Reorder_Level": 5,
                "Unit_Price": "1.50",
                "Total_Value": "15",
                "Stock_Status": "Adequate",
                "Warehouse": "W1",
                "Supplier": "Acme"
            },
            {
                "SKU": "SKU-002",
                "Product": "Copper Wire",
                "Category": "Electrical",
                "Quantity": 2,
                "Reorder_Level": 5,
                "Unit_Price": "4.00",
                "Total_Value": "8",
                "Stock_Status": "Critical",
                "Warehouse": "W2",
                "Supplier": "Volt"
            }
        ])
        .to_string()
    }

    #[test]
    fn test_filter_stock_by_status() {
        let result = filter_stock(&records_json(), r#"{"statusFilter": "Critical"}"#).unwrap();
        let records: Vec<StockRecord> = serde_json::from_str(&result).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sku, "SKU-002");
        assert_eq!(records[0].quantity, Decimal::from(2));
    }

    #[test]
    fn test_sort_stock_by_value_desc() {
        let result = sort_stock(&records_json(), "Total_Value", "desc").unwrap();
        let records: Vec<StockRecord> = serde_json::from_str(&result).unwrap();
        assert_eq!(records[0].sku, "SKU-001");
    }

    #[test]
    fn test_export_header_and_quoting() {
        let csv = export_stock_csv(&records_json()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"SKU\",\"Product\",\"Category\",\"Quantity\",\"Reorder_Level\",\"Unit_Price\",\"Total_Value\",\"Stock_Status\",\"Warehouse\",\"Supplier\""
        );
        assert!(lines.next().unwrap().starts_with("\"SKU-001\""));
    }

    #[test]
    fn test_export_filename_carries_date() {
        assert_eq!(
            export_filename("2024-03-09").unwrap(),
            "inventory_export_2024-03-09.csv"
        );
    }

    #[test]
    fn test_format_kpi_value_percentage() {
        let value = format_kpi_value("stockout_rate", r#"{"value": 12.5}"#).unwrap();
        assert_eq!(value, "12.5%");
    }

    #[test]
    fn test_kpi_detail_presents_narrative() {
        let detail_json = kpi_detail(
            "stockout_rate",
            r#"{"value": 12.5, "stockout_items": 4}"#,
            &records_json(),
            0.6,
        )
        .unwrap();
        let detail: serde_json::Value = serde_json::from_str(&detail_json).unwrap();
        assert_eq!(detail["value"], "12.5%");
        assert_eq!(detail["steps"][0], "1. Total Items: 2");
    }

    #[test]
    fn test_quick_stats_counts() {
        let stats_json = quick_stats(&records_json()).unwrap();
        let stats: serde_json::Value = serde_json::from_str(&stats_json).unwrap();
        assert_eq!(stats["total_products"], 2);
        assert_eq!(stats["critical_count"], 1);
        assert_eq!(stats["warehouse_count"], 2);
    }

    #[test]
    fn test_forecast_summary_rounds() {
        let response = serde_json::json!({
            "periods": 2,
            "model": "SimpleMA",
            "forecast": [
                {"date": "2025-04-01", "forecast": 10.4, "lower_bound": 8.0, "upper_bound": 12.0},
                {"date": "2025-04-02", "forecast": 20.4, "lower_bound": 16.0, "upper_bound": 24.0}
            ]
        });
        let summary_json = forecast_summary(&response.to_string()).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&summary_json).unwrap();
        assert_eq!(summary["total_demand"], 31);
        assert_eq!(summary["model"], "SimpleMA");
    }

    #[test]
    fn test_visible_summary_line() {
        assert_eq!(visible_summary(3, 10), "Showing 3 of 10 products");
    }

    #[test]
    fn test_forecast_periods_valid() {
        assert!(forecast_periods_valid(30));
        assert!(!forecast_periods_valid(45));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_currency(1234567.8), "$1,234,568");
        assert_eq!(format_percent(12.5), "12.5%");
        assert_eq!(format_thousands(1250.0), "1,250");
    }
}
