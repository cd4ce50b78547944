//! Chart pipeline: pure aggregations paired with spec builders.
//!
//! Record-based aggregations always produce a spec (possibly with empty
//! series). KPI-derived builders return [`NoData`] when the bundle lacks
//! the named sub-field, and the renderer shows a placeholder instead.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{
    num_field, obj_field, ChartSpec, ForecastResponse, KpiBundle, KpiId, Layout, Series,
    StockRecord, TransactionRecord,
};

/// Preferred carrying-cost breakdown order; extra keys follow.
const BREAKDOWN_ORDER: [&str; 4] = ["storage", "insurance", "obsolescence", "opportunity"];

/// Preferred aging bucket order; extra keys follow.
const AGE_BUCKET_ORDER: [&str; 4] = ["0-30 days", "31-60 days", "61-90 days", "90+ days"];

/// How many products the value leaderboard shows.
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// Explicit "nothing to plot" outcome carrying the placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NoData(pub String);

pub type ChartResult = Result<ChartSpec, NoData>;

/// Record count per stock status, in first-occurrence order.
pub fn status_distribution(records: &[StockRecord]) -> ChartSpec {
    let (labels, values) = grouped_sum(
        records
            .iter()
            .map(|r| (r.stock_status.as_str(), Decimal::ONE)),
    );
    ChartSpec {
        series: vec![Series::Pie {
            labels,
            values,
            hole: 0.4,
        }],
        layout: Layout::titled("Stock Status Distribution"),
    }
}

/// Total quantity per category, in first-occurrence order.
pub fn category_quantity(records: &[StockRecord]) -> ChartSpec {
    let (labels, values) = grouped_sum(records.iter().map(|r| (r.category.as_str(), r.quantity)));
    ChartSpec {
        series: vec![Series::Bar {
            name: None,
            x: labels,
            y: values,
            horizontal: false,
        }],
        layout: Layout {
            y_title: Some("Units".to_string()),
            ..Layout::titled("Quantity by Category")
        },
    }
}

/// Total inventory value per warehouse, in first-occurrence order.
pub fn warehouse_value(records: &[StockRecord]) -> ChartSpec {
    let (labels, values) = grouped_sum(
        records
            .iter()
            .map(|r| (r.warehouse.as_str(), r.total_value)),
    );
    ChartSpec {
        series: vec![Series::Bar {
            name: None,
            x: labels,
            y: values,
            horizontal: false,
        }],
        layout: Layout {
            y_title: Some("Value ($)".to_string()),
            ..Layout::titled("Inventory Value by Warehouse")
        },
    }
}

/// Ten most valuable products, descending; ties keep snapshot order.
pub fn top_products_by_value(records: &[StockRecord]) -> ChartSpec {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    ranked.truncate(TOP_PRODUCTS_LIMIT);

    let labels = ranked.iter().map(|r| r.product.clone()).collect();
    let values = ranked
        .iter()
        .map(|r| r.total_value.to_f64().unwrap_or(0.0))
        .collect();
    ChartSpec {
        series: vec![Series::Bar {
            name: None,
            x: labels,
            y: values,
            horizontal: true,
        }],
        layout: Layout {
            x_title: Some("Value ($)".to_string()),
            ..Layout::titled("Top 10 Products by Value")
        },
    }
}

/// Daily transaction value, ascending by calendar date.
///
/// Records without a parseable date cannot sit on the axis and are
/// skipped.
pub fn transaction_trends(transactions: &[TransactionRecord]) -> ChartSpec {
    let mut buckets: BTreeMap<chrono::NaiveDate, Decimal> = BTreeMap::new();
    for transaction in transactions {
        if let Some(date) = transaction.date {
            *buckets.entry(date.date()).or_insert(Decimal::ZERO) += transaction.total_value;
        }
    }

    let labels = buckets.keys().map(|d| d.to_string()).collect();
    let values = buckets
        .values()
        .map(|v| v.to_f64().unwrap_or(0.0))
        .collect();
    ChartSpec {
        series: vec![Series::Line {
            name: Some("Transaction Value".to_string()),
            x: labels,
            y: values,
            secondary_axis: false,
        }],
        layout: Layout {
            x_title: Some("Date".to_string()),
            y_title: Some("Value ($)".to_string()),
            ..Layout::titled("Transaction Trends")
        },
    }
}

/// Carrying-cost components from `carrying_cost.breakdown`.
pub fn carrying_cost_breakdown(kpis: &KpiBundle) -> ChartResult {
    let breakdown = kpis
        .get(KpiId::CarryingCost)
        .and_then(|v| obj_field(v, "breakdown"))
        .ok_or_else(|| NoData("No carrying cost data available".to_string()))?;

    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for key in BREAKDOWN_ORDER {
        if let Some(value) = breakdown.get(key).and_then(Value::as_f64) {
            labels.push(capitalize(key));
            values.push(value);
        }
    }
    for (key, value) in breakdown {
        if BREAKDOWN_ORDER.contains(&key.as_str()) {
            continue;
        }
        if let Some(value) = value.as_f64() {
            labels.push(capitalize(key));
            values.push(value);
        }
    }
    if labels.is_empty() {
        return Err(NoData("No carrying cost data available".to_string()));
    }

    Ok(ChartSpec {
        series: vec![Series::Bar {
            name: None,
            x: labels,
            y: values,
            horizontal: false,
        }],
        layout: Layout {
            y_title: Some("Annual Cost ($)".to_string()),
            ..Layout::titled("Carrying Cost Breakdown")
        },
    })
}

/// Quality score bars with a total-value line per supplier.
pub fn supplier_performance(kpis: &KpiBundle) -> ChartResult {
    let suppliers = kpis
        .get(KpiId::SupplierPerformance)
        .and_then(|v| obj_field(v, "suppliers"))
        .filter(|m| !m.is_empty())
        .ok_or_else(|| NoData("No supplier performance data available".to_string()))?;

    let names: Vec<String> = suppliers.keys().cloned().collect();
    let quality = suppliers
        .values()
        .map(|v| num_field(v, "quality_score").unwrap_or(0.0))
        .collect();
    let totals = suppliers
        .values()
        .map(|v| num_field(v, "total_value").unwrap_or(0.0))
        .collect();

    Ok(ChartSpec {
        series: vec![
            Series::Bar {
                name: Some("Quality Score".to_string()),
                x: names.clone(),
                y: quality,
                horizontal: false,
            },
            Series::Line {
                name: Some("Total Value".to_string()),
                x: names,
                y: totals,
                secondary_axis: true,
            },
        ],
        layout: Layout {
            y_title: Some("Quality Score".to_string()),
            y2_title: Some("Total Value ($)".to_string()),
            ..Layout::titled("Supplier Performance")
        },
    })
}

/// Item counts per age bucket from `item_aging.age_distribution`.
pub fn aging_item_counts(kpis: &KpiBundle) -> ChartResult {
    aging_chart(kpis, "age_distribution", "Items by Age", "Items")
}

/// Inventory value per age bucket from `item_aging.value_by_age`.
pub fn aging_value(kpis: &KpiBundle) -> ChartResult {
    aging_chart(kpis, "value_by_age", "Value by Age", "Value ($)")
}

fn aging_chart(kpis: &KpiBundle, field: &str, title: &str, y_title: &str) -> ChartResult {
    let buckets = kpis
        .get(KpiId::ItemAging)
        .and_then(|v| obj_field(v, field))
        .ok_or_else(|| NoData("No aging data available".to_string()))?;

    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for key in AGE_BUCKET_ORDER {
        if let Some(value) = buckets.get(key).and_then(Value::as_f64) {
            labels.push(key.to_string());
            values.push(value);
        }
    }
    for (key, value) in buckets {
        if AGE_BUCKET_ORDER.contains(&key.as_str()) {
            continue;
        }
        if let Some(value) = value.as_f64() {
            labels.push(key.clone());
            values.push(value);
        }
    }
    if labels.is_empty() {
        return Err(NoData("No aging data available".to_string()));
    }

    Ok(ChartSpec {
        series: vec![Series::Bar {
            name: None,
            x: labels,
            y: values,
            horizontal: false,
        }],
        layout: Layout {
            y_title: Some(y_title.to_string()),
            ..Layout::titled(title)
        },
    })
}

/// Forecast line with its confidence band as separate series.
pub fn forecast_chart(response: &ForecastResponse) -> ChartSpec {
    let dates: Vec<String> = response
        .forecast
        .iter()
        .map(|p| p.date_label().to_string())
        .collect();
    let forecast = response.forecast.iter().map(|p| p.forecast).collect();
    let upper = response.forecast.iter().map(|p| p.upper_bound).collect();
    let lower = response.forecast.iter().map(|p| p.lower_bound).collect();
    let title = if response.model.is_empty() {
        "Demand Forecast".to_string()
    } else {
        format!("Demand Forecast ({})", response.model)
    };

    ChartSpec {
        series: vec![
            Series::Line {
                name: Some("Forecast".to_string()),
                x: dates.clone(),
                y: forecast,
                secondary_axis: false,
            },
            Series::Line {
                name: Some("Upper Bound".to_string()),
                x: dates.clone(),
                y: upper,
                secondary_axis: false,
            },
            Series::Line {
                name: Some("Lower Bound".to_string()),
                x: dates,
                y: lower,
                secondary_axis: false,
            },
        ],
        layout: Layout {
            x_title: Some("Date".to_string()),
            y_title: Some("Predicted Demand".to_string()),
            ..Layout::titled(&title)
        },
    }
}

/// Group-by with first-occurrence ordering; empty labels become Unknown.
fn grouped_sum<'a>(items: impl Iterator<Item = (&'a str, Decimal)>) -> (Vec<String>, Vec<f64>) {
    let mut labels: Vec<String> = Vec::new();
    let mut sums: Vec<Decimal> = Vec::new();
    for (label, value) in items {
        let label = if label.is_empty() { "Unknown" } else { label };
        match labels.iter().position(|l| l == label) {
            Some(i) => sums[i] += value,
            None => {
                labels.push(label.to_string());
                sums.push(value);
            }
        }
    }
    let values = sums
        .into_iter()
        .map(|d| d.to_f64().unwrap_or(0.0))
        .collect();
    (labels, values)
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, StockStatus};
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(product: &str, status: StockStatus, value: i64) -> StockRecord {
        StockRecord {
            sku: format!("SKU-{product}"),
            product: product.to_string(),
            category: "Hardware".to_string(),
            quantity: Decimal::from(4),
            reorder_level: Decimal::ONE,
            unit_price: Decimal::ONE,
            total_value: Decimal::from(value),
            stock_status: status,
            warehouse: "W1".to_string(),
            supplier: "Acme".to_string(),
        }
    }

    fn bundle(id: KpiId, payload: serde_json::Value) -> KpiBundle {
        let mut map = std::collections::BTreeMap::new();
        map.insert(id.as_str().to_string(), payload);
        KpiBundle(map)
    }

    #[test]
    fn test_status_pie_first_occurrence_order() {
        let records = vec![
            record("a", StockStatus::Low, 1),
            record("b", StockStatus::Critical, 1),
            record("c", StockStatus::Low, 1),
            record("d", StockStatus::Unknown, 1),
        ];
        let spec = status_distribution(&records);
        match &spec.series[0] {
            Series::Pie {
                labels,
                values,
                hole,
            } => {
                assert_eq!(labels, &["Low", "Critical", "Unknown"]);
                assert_eq!(values, &[2.0, 1.0, 1.0]);
                assert_eq!(*hole, 0.4);
            }
            other => panic!("expected pie, got {other:?}"),
        }
    }

    #[test]
    fn test_top_products_truncates_and_keeps_tie_order() {
        let mut records: Vec<StockRecord> =
            (0..12).map(|i| record(&format!("p{i}"), StockStatus::Adequate, 100)).collect();
        records[3].total_value = Decimal::from(500);
        let spec = top_products_by_value(&records);
        match &spec.series[0] {
            Series::Bar { x, horizontal, .. } => {
                assert_eq!(x.len(), TOP_PRODUCTS_LIMIT);
                assert_eq!(x[0], "p3");
                // Tied records keep their snapshot order.
                assert_eq!(x[1], "p0");
                assert_eq!(x[2], "p1");
                assert!(*horizontal);
            }
            other => panic!("expected bar, got {other:?}"),
        }
    }

    #[test]
    fn test_trends_bucket_by_day_ascending() {
        let day = |d: u32, v: i64| TransactionRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, d)
                .unwrap()
                .and_hms_opt(8, 0, 0),
            total_value: Decimal::from(v),
            ..TransactionRecord::default()
        };
        let mut dateless = TransactionRecord::default();
        dateless.total_value = Decimal::from(999);
        let transactions = vec![day(9, 10), day(2, 5), day(9, 1), dateless];

        let spec = transaction_trends(&transactions);
        match &spec.series[0] {
            Series::Line { x, y, .. } => {
                assert_eq!(x, &["2024-03-02", "2024-03-09"]);
                assert_eq!(y, &[5.0, 11.0]);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_carrying_cost_preferred_order_then_extras() {
        let kpis = bundle(
            KpiId::CarryingCost,
            json!({"breakdown": {"opportunity": 4.0, "storage": 1.0, "handling": 9.0}}),
        );
        let spec = carrying_cost_breakdown(&kpis).unwrap();
        match &spec.series[0] {
            Series::Bar { x, y, .. } => {
                assert_eq!(x, &["Storage", "Opportunity", "Handling"]);
                assert_eq!(y, &[1.0, 4.0, 9.0]);
            }
            other => panic!("expected bar, got {other:?}"),
        }
    }

    #[test]
    fn test_carrying_cost_missing_breakdown_is_no_data() {
        let err = carrying_cost_breakdown(&KpiBundle::default()).unwrap_err();
        assert_eq!(err.0, "No carrying cost data available");
        let empty = bundle(KpiId::CarryingCost, json!({"breakdown": {}}));
        assert!(carrying_cost_breakdown(&empty).is_err());
    }

    #[test]
    fn test_supplier_performance_pairs_bars_with_secondary_line() {
        let kpis = bundle(
            KpiId::SupplierPerformance,
            json!({"suppliers": {
                "Zenith": {"quality_score": 88.0, "total_value": 1000.0},
                "Acme": {"quality_score": 92.5, "total_value": 400.0}
            }}),
        );
        let spec = supplier_performance(&kpis).unwrap();
        assert_eq!(spec.series.len(), 2);
        match &spec.series[0] {
            Series::Bar { x, y, .. } => {
                assert_eq!(x, &["Acme", "Zenith"]);
                assert_eq!(y, &[92.5, 88.0]);
            }
            other => panic!("expected bar, got {other:?}"),
        }
        match &spec.series[1] {
            Series::Line {
                y, secondary_axis, ..
            } => {
                assert_eq!(y, &[400.0, 1000.0]);
                assert!(*secondary_axis);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_aging_buckets_in_fixed_order() {
        let kpis = bundle(
            KpiId::ItemAging,
            json!({"age_distribution": {"90+ days": 2, "0-30 days": 7, "31-60 days": 4}}),
        );
        let spec = aging_item_counts(&kpis).unwrap();
        match &spec.series[0] {
            Series::Bar { x, y, .. } => {
                assert_eq!(x, &["0-30 days", "31-60 days", "90+ days"]);
                assert_eq!(y, &[7.0, 4.0, 2.0]);
            }
            other => panic!("expected bar, got {other:?}"),
        }
        assert_eq!(
            aging_value(&KpiBundle::default()).unwrap_err().0,
            "No aging data available"
        );
    }

    #[test]
    fn test_forecast_chart_has_bounds() {
        let response = ForecastResponse {
            model: "XGBoost".to_string(),
            forecast: vec![ForecastPoint {
                date: "2024-04-01T00:00:00".to_string(),
                forecast: 12.0,
                lower_bound: 9.0,
                upper_bound: 15.0,
            }],
            ..ForecastResponse::default()
        };
        let spec = forecast_chart(&response);
        let names: Vec<_> = spec
            .series
            .iter()
            .map(|s| match s {
                Series::Line { name, .. } => name.clone().unwrap_or_default(),
                other => panic!("expected line, got {other:?}"),
            })
            .collect();
        assert_eq!(names, &["Forecast", "Upper Bound", "Lower Bound"]);
        assert_eq!(spec.layout.title, "Demand Forecast (XGBoost)");
        match &spec.series[0] {
            Series::Line { x, .. } => assert_eq!(x, &["2024-04-01"]),
            other => panic!("expected line, got {other:?}"),
        }
    }
}
