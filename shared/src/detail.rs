//! KPI detail presentation: headline formatting, calculation narrative,
//! and related-record selection.
//!
//! Dispatch is a total mapping over [`KpiId`]; every identifier resolves
//! to exactly one format, at most one narrative template, and one
//! related-record rule.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::format;
use crate::models::{num_field, str_field, KpiId, StockRecord, StockStatus};

/// Estimated cost-of-goods share of inventory value in the turnover
/// narrative. Overridable through `narrative.cogs_ratio` configuration.
pub const DEFAULT_COGS_RATIO: f64 = 0.60;

/// Narrative fallback when the payload lacks `carrying_cost_rate`, in percent.
pub const DEFAULT_CARRYING_COST_RATE: f64 = 25.0;

/// Cap on related-record rows under a detail view.
pub const RELATED_RECORDS_LIMIT: usize = 5;

/// Headline display rule for a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    Percentage,
    Currency,
    Multiplier,
    Days,
    /// Unformatted; `N/A` when no value is present.
    Raw,
}

impl KpiFormat {
    pub fn for_id(id: KpiId) -> KpiFormat {
        match id {
            KpiId::StockAccuracy
            | KpiId::StockoutRate
            | KpiId::OrderFulfillment
            | KpiId::DeadStockPercentage
            | KpiId::BackorderRate
            | KpiId::FillRate => KpiFormat::Percentage,
            KpiId::CarryingCost | KpiId::InventoryShrinkage => KpiFormat::Currency,
            KpiId::InventoryTurnover => KpiFormat::Multiplier,
            KpiId::DaysSalesInventory | KpiId::LeadTime => KpiFormat::Days,
            KpiId::AbcAnalysis
            | KpiId::InventoryValuation
            | KpiId::SupplierPerformance
            | KpiId::ItemAging => KpiFormat::Raw,
        }
    }
}

/// Payload fields tried for the headline value, in order.
fn value_candidates(id: KpiId) -> &'static [&'static str] {
    match id {
        KpiId::InventoryTurnover => &["value", "annual_turnover"],
        KpiId::DaysSalesInventory => &["value", "dsi", "days_sales_inventory"],
        KpiId::StockAccuracy => &["value", "accuracy_rate"],
        KpiId::StockoutRate => &["value", "stockout_rate"],
        KpiId::OrderFulfillment => &["value", "fulfillment_rate"],
        KpiId::CarryingCost => &["value", "annual_carrying_cost"],
        KpiId::DeadStockPercentage => &["value", "dead_stock_percentage"],
        KpiId::BackorderRate => &["value", "backorder_rate"],
        KpiId::FillRate => &["value", "fill_rate"],
        KpiId::InventoryShrinkage => &["value", "shrinkage_value"],
        KpiId::LeadTime => &["value", "average_lead_time_days"],
        KpiId::AbcAnalysis
        | KpiId::InventoryValuation
        | KpiId::SupplierPerformance
        | KpiId::ItemAging => &["value"],
    }
}

/// First candidate field present on the payload.
pub fn headline_value(id: KpiId, payload: &Value) -> Option<f64> {
    value_candidates(id)
        .iter()
        .find_map(|field| num_field(payload, field))
}

/// Formatted headline value, e.g. `12.5%`, `$4,000`, `8.2x`, `45 days`.
pub fn format_value(id: KpiId, payload: &Value) -> String {
    let value = headline_value(id, payload);
    match KpiFormat::for_id(id) {
        KpiFormat::Percentage => format::percent(value.unwrap_or(0.0)),
        KpiFormat::Currency => format::currency(value.unwrap_or(0.0)),
        KpiFormat::Multiplier => format::multiplier(value.unwrap_or(0.0)),
        KpiFormat::Days => format::days(value.unwrap_or(0.0)),
        KpiFormat::Raw => match value {
            Some(v) => format::number(v),
            None => "N/A".to_string(),
        },
    }
}

/// Numbered derivation steps; KPIs without a template get none.
pub fn calculation_steps(
    id: KpiId,
    payload: &Value,
    stock: &[StockRecord],
    cogs_ratio: f64,
) -> Vec<String> {
    let total_value: Decimal = stock.iter().map(|r| r.total_value).sum();
    let total_value = total_value.to_f64().unwrap_or(0.0);
    let total_items = stock.len();

    match id {
        KpiId::InventoryTurnover => vec![
            format!("1. Total Inventory Value: {}", format::currency(total_value)),
            format!("2. Number of Products: {}", total_items),
            format!(
                "3. Estimated COGS ({}%): {}",
                format::number(cogs_ratio * 100.0),
                format::currency(total_value * cogs_ratio)
            ),
            format!(
                "4. Annual Turnover: {}",
                format::multiplier(num_field(payload, "annual_turnover").unwrap_or(0.0))
            ),
        ],
        KpiId::StockoutRate => vec![
            format!("1. Total Items: {}", total_items),
            format!(
                "2. Items Below Reorder: {}",
                format::number(num_field(payload, "stockout_items").unwrap_or(0.0))
            ),
            format!(
                "3. Stockout Rate: {}",
                format::percent(num_field(payload, "stockout_rate").unwrap_or(0.0))
            ),
        ],
        KpiId::CarryingCost => vec![
            format!("1. Inventory Value: {}", format::currency(total_value)),
            format!(
                "2. Carrying Rate: {}",
                format::percent(
                    num_field(payload, "carrying_cost_rate")
                        .unwrap_or(DEFAULT_CARRYING_COST_RATE)
                )
            ),
            format!(
                "3. Annual Cost: {}",
                format::currency(num_field(payload, "annual_carrying_cost").unwrap_or(0.0))
            ),
        ],
        _ => Vec::new(),
    }
}

/// Display-ready row in the related-products table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedRecord {
    pub product: String,
    pub quantity: String,
    pub total_value: String,
    pub status: String,
}

impl RelatedRecord {
    fn from_stock(record: &StockRecord) -> RelatedRecord {
        RelatedRecord {
            product: record.product.clone(),
            quantity: format::thousands_dec(record.quantity),
            total_value: format::currency_dec(record.total_value),
            status: record.stock_status.to_string(),
        }
    }
}

/// KPI-specific related selection; an empty result means no section.
pub fn related_records(id: KpiId, stock: &[StockRecord]) -> Vec<RelatedRecord> {
    let picked: Vec<&StockRecord> = match id {
        KpiId::StockoutRate | KpiId::BackorderRate => stock
            .iter()
            .filter(|r| r.stock_status.needs_reorder())
            .take(RELATED_RECORDS_LIMIT)
            .collect(),
        KpiId::DeadStockPercentage => stock
            .iter()
            .filter(|r| r.stock_status == StockStatus::Overstocked)
            .take(RELATED_RECORDS_LIMIT)
            .collect(),
        _ => {
            let mut ranked: Vec<&StockRecord> = stock.iter().collect();
            ranked.sort_by(|a, b| b.total_value.cmp(&a.total_value));
            ranked.truncate(RELATED_RECORDS_LIMIT);
            ranked
        }
    };
    picked.into_iter().map(RelatedRecord::from_stock).collect()
}

/// Everything the renderer needs for one KPI detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDetailView {
    pub id: KpiId,
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub formula: Option<String>,
    pub steps: Vec<String>,
    pub interpretation: Option<String>,
    pub benchmark: Option<String>,
    pub related: Vec<RelatedRecord>,
}

/// Assemble the detail view from a fetched payload and the current stock.
pub fn present(
    id: KpiId,
    payload: &Value,
    stock: &[StockRecord],
    cogs_ratio: f64,
) -> KpiDetailView {
    let interpretation = str_field(payload, "interpretation").map(String::from);
    KpiDetailView {
        id,
        title: str_field(payload, "title")
            .map(String::from)
            .unwrap_or_else(|| id.label().to_string()),
        value: format_value(id, payload),
        subtitle: str_field(payload, "subtitle")
            .map(String::from)
            .or_else(|| interpretation.clone()),
        formula: str_field(payload, "formula").map(String::from),
        steps: calculation_steps(id, payload, stock, cogs_ratio),
        interpretation,
        benchmark: str_field(payload, "benchmark").map(String::from),
        related: related_records(id, stock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(product: &str, status: StockStatus, value: i64) -> StockRecord {
        StockRecord {
            sku: format!("SKU-{product}"),
            product: product.to_string(),
            category: "Hardware".to_string(),
            quantity: Decimal::from(3),
            reorder_level: Decimal::ONE,
            unit_price: Decimal::ONE,
            total_value: Decimal::from(value),
            stock_status: status,
            warehouse: "W1".to_string(),
            supplier: "Acme".to_string(),
        }
    }

    #[test]
    fn test_every_kpi_has_a_format() {
        for id in KpiId::ALL {
            // The mapping is total; formatting never panics on an empty payload.
            let rendered = format_value(id, &json!({}));
            assert!(!rendered.is_empty(), "{id} rendered nothing");
        }
    }

    #[test]
    fn test_percentage_formatting() {
        let payload = json!({"stockout_rate": 12.5});
        assert_eq!(format_value(KpiId::StockoutRate, &payload), "12.5%");
        assert_eq!(format_value(KpiId::StockoutRate, &json!({})), "0%");
    }

    #[test]
    fn test_currency_formatting_groups_thousands() {
        let payload = json!({"annual_carrying_cost": 4000});
        assert_eq!(format_value(KpiId::CarryingCost, &payload), "$4,000");
    }

    #[test]
    fn test_value_field_wins_over_primary_field() {
        let payload = json!({"value": 7.0, "annual_turnover": 5.8});
        assert_eq!(format_value(KpiId::InventoryTurnover, &payload), "7x");
    }

    #[test]
    fn test_raw_format_falls_back_to_na() {
        assert_eq!(format_value(KpiId::AbcAnalysis, &json!({})), "N/A");
        assert_eq!(format_value(KpiId::AbcAnalysis, &json!({"value": 3})), "3");
    }

    #[test]
    fn test_days_formatting_reads_dsi() {
        let payload = json!({"dsi": 45});
        assert_eq!(format_value(KpiId::DaysSalesInventory, &payload), "45 days");
    }

    #[test]
    fn test_turnover_narrative_steps() {
        let stock = vec![
            record("a", StockStatus::Adequate, 6000),
            record("b", StockStatus::Adequate, 4000),
        ];
        let payload = json!({"annual_turnover": 5.8});
        let steps =
            calculation_steps(KpiId::InventoryTurnover, &payload, &stock, DEFAULT_COGS_RATIO);
        assert_eq!(
            steps,
            vec![
                "1. Total Inventory Value: $10,000",
                "2. Number of Products: 2",
                "3. Estimated COGS (60%): $6,000",
                "4. Annual Turnover: 5.8x",
            ]
        );
    }

    #[test]
    fn test_carrying_cost_narrative_uses_default_rate() {
        let steps = calculation_steps(KpiId::CarryingCost, &json!({}), &[], DEFAULT_COGS_RATIO);
        assert_eq!(
            steps,
            vec![
                "1. Inventory Value: $0",
                "2. Carrying Rate: 25%",
                "3. Annual Cost: $0",
            ]
        );
    }

    #[test]
    fn test_kpis_without_template_have_no_steps() {
        assert!(calculation_steps(KpiId::FillRate, &json!({}), &[], DEFAULT_COGS_RATIO).is_empty());
    }

    #[test]
    fn test_stockout_related_picks_critical_and_low() {
        let stock = vec![
            record("a", StockStatus::Adequate, 10),
            record("b", StockStatus::Critical, 10),
            record("c", StockStatus::Low, 10),
        ];
        let related = related_records(KpiId::StockoutRate, &stock);
        let products: Vec<_> = related.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["b", "c"]);
    }

    #[test]
    fn test_default_related_is_top_by_value() {
        let stock: Vec<StockRecord> = (0..7)
            .map(|i| record(&format!("p{i}"), StockStatus::Adequate, 100 + i))
            .collect();
        let related = related_records(KpiId::InventoryTurnover, &stock);
        assert_eq!(related.len(), RELATED_RECORDS_LIMIT);
        assert_eq!(related[0].product, "p6");
        assert_eq!(related[0].total_value, "$106");
    }

    #[test]
    fn test_dead_stock_related_picks_overstocked() {
        let stock = vec![
            record("a", StockStatus::Overstocked, 10),
            record("b", StockStatus::Critical, 10),
        ];
        let related = related_records(KpiId::DeadStockPercentage, &stock);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].product, "a");
        assert_eq!(related[0].status, "Overstocked");
    }

    #[test]
    fn test_present_falls_back_to_label_and_interpretation() {
        let payload = json!({"stockout_rate": 3.0, "interpretation": "Healthy"});
        let view = present(KpiId::StockoutRate, &payload, &[], DEFAULT_COGS_RATIO);
        assert_eq!(view.title, "Stockout Rate");
        assert_eq!(view.value, "3%");
        assert_eq!(view.subtitle.as_deref(), Some("Healthy"));
        assert_eq!(view.interpretation.as_deref(), Some("Healthy"));
        assert!(view.formula.is_none());
        assert!(view.related.is_empty());
    }

    #[test]
    fn test_present_prefers_server_strings() {
        let payload = json!({
            "title": "Inventory Carrying Cost",
            "subtitle": "Annualized",
            "formula": "Value x Rate",
            "benchmark": "20-30% of inventory value",
            "annual_carrying_cost": 1200
        });
        let view = present(KpiId::CarryingCost, &payload, &[], DEFAULT_COGS_RATIO);
        assert_eq!(view.title, "Inventory Carrying Cost");
        assert_eq!(view.value, "$1,200");
        assert_eq!(view.subtitle.as_deref(), Some("Annualized"));
        assert_eq!(view.formula.as_deref(), Some("Value x Rate"));
        assert_eq!(view.benchmark.as_deref(), Some("20-30% of inventory value"));
    }
}
