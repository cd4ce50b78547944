//! Tab view models: immutable, display-ready structures handed to renderers.
//!
//! Builders here are pure functions over the snapshot; the controller
//! computes a full view model first, then the renderer materializes it
//! (phase 1) before individual chart regions are filled in (phase 2).

use serde::Serialize;
use serde_json::Value;

use shared::charts::{self, ChartResult};
use shared::models::regions;
use shared::table::{SortDirection, StockField, TableFilter};
use shared::{
    format, num_field, str_field, ChartSpec, ForecastModel, ForecastResponse, ForecastSummary,
    KpiBundle, KpiId, Snapshot, StockRecord, StockStats, FORECAST_PERIOD_CHOICES,
};

/// KPIs shown as financial cards, in display order.
pub const FINANCIAL_CARDS: [KpiId; 5] = [
    KpiId::InventoryTurnover,
    KpiId::DaysSalesInventory,
    KpiId::CarryingCost,
    KpiId::DeadStockPercentage,
    KpiId::InventoryShrinkage,
];

/// KPIs shown as operational cards, in display order.
pub const OPERATIONAL_CARDS: [KpiId; 5] = [
    KpiId::StockAccuracy,
    KpiId::StockoutRate,
    KpiId::OrderFulfillment,
    KpiId::BackorderRate,
    KpiId::FillRate,
];

/// One chart region with either a spec or its placeholder text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlot {
    pub region: &'static str,
    pub content: SlotContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotContent {
    Chart { spec: ChartSpec },
    Placeholder { message: String },
}

impl ChartSlot {
    pub fn chart(region: &'static str, spec: ChartSpec) -> ChartSlot {
        ChartSlot {
            region,
            content: SlotContent::Chart { spec },
        }
    }

    pub fn from_result(region: &'static str, result: ChartResult) -> ChartSlot {
        match result {
            Ok(spec) => ChartSlot::chart(region, spec),
            Err(no_data) => ChartSlot {
                region,
                content: SlotContent::Placeholder { message: no_data.0 },
            },
        }
    }
}

/// Generic stat card used by the overview strip and forecast metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub subtitle: String,
}

/// One KPI card in the financial/operational/supply-chain grids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub id: KpiId,
    pub label: String,
    pub value: String,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierLeadTime {
    pub supplier: String,
    pub days: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbcClassCard {
    pub class_name: String,
    pub items: String,
    pub item_share: String,
    pub value: String,
    pub value_share: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationCard {
    pub label: String,
    pub value: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOption {
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Per-tab view models, computed in full before any rendering starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum TabView {
    Overview(OverviewView),
    Kpis(KpiTabView),
    Analytics(AnalyticsView),
    Forecasting(ForecastingView),
    Details(DetailsView),
}

impl TabView {
    /// Chart slots the controller fills during render phase 2.
    pub fn chart_slots(&self) -> &[ChartSlot] {
        match self {
            TabView::Overview(view) => &view.charts,
            TabView::Kpis(view) => &view.charts,
            TabView::Analytics(view) => &view.charts,
            TabView::Forecasting(_) | TabView::Details(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub cards: Vec<StatCard>,
    pub charts: Vec<ChartSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTabView {
    pub financial: Vec<KpiCard>,
    pub operational: Vec<KpiCard>,
    pub lead_time: KpiCard,
    pub supplier_lead_times: Vec<SupplierLeadTime>,
    pub charts: Vec<ChartSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub abc: Vec<AbcClassCard>,
    pub valuation: Vec<ValuationCard>,
    pub charts: Vec<ChartSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastingView {
    pub products: Vec<ProductOption>,
    pub periods: Vec<u32>,
    pub default_periods: u32,
    pub models: Vec<ModelOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub rows: Vec<StockRecord>,
    pub summary: String,
    pub warehouses: Vec<String>,
}

/// Forecast results region: chart, headline metrics, tabular series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub chart: ChartSpec,
    pub summary: ForecastSummary,
    pub cards: Vec<StatCard>,
    pub periods: u32,
    pub rows: Vec<ForecastRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastRow {
    pub date: String,
    pub forecast: String,
    pub lower: String,
    pub upper: String,
}

/// Export artifact handed to the shell for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

// ============================================================================
// Tab view builders
// ============================================================================

pub fn overview_view(snapshot: &Snapshot) -> OverviewView {
    let stats = StockStats::compute(&snapshot.stock);
    let average_value = if stats.total_products == 0 {
        rust_decimal::Decimal::ZERO
    } else {
        (stats.total_value / rust_decimal::Decimal::from(stats.total_products as u64)).round()
    };

    let cards = vec![
        StatCard {
            label: "Total Products".to_string(),
            value: stats.total_products.to_string(),
            subtitle: format!("{} Units", format::thousands_dec(stats.total_quantity)),
        },
        StatCard {
            label: "Total Value".to_string(),
            value: format::currency_dec(stats.total_value),
            subtitle: format!("Avg: {}", format::currency_dec(average_value)),
        },
        StatCard {
            label: "Low Stock Items".to_string(),
            value: stats.low_stock_count.to_string(),
            subtitle: format!("{} Critical", stats.critical_count),
        },
        StatCard {
            label: "Warehouses".to_string(),
            value: stats.warehouse_count.to_string(),
            subtitle: format!("{} Suppliers", stats.supplier_count),
        },
    ];

    let charts = vec![
        ChartSlot::chart(
            regions::STOCK_STATUS,
            charts::status_distribution(&snapshot.stock),
        ),
        ChartSlot::chart(regions::CATEGORY, charts::category_quantity(&snapshot.stock)),
        ChartSlot::chart(regions::WAREHOUSE, charts::warehouse_value(&snapshot.stock)),
        ChartSlot::chart(
            regions::TOP_PRODUCTS,
            charts::top_products_by_value(&snapshot.stock),
        ),
    ];

    OverviewView { cards, charts }
}

pub fn kpi_tab_view(snapshot: &Snapshot) -> KpiTabView {
    let kpis = &snapshot.kpis;
    KpiTabView {
        financial: FINANCIAL_CARDS.iter().map(|id| kpi_card(*id, kpis)).collect(),
        operational: OPERATIONAL_CARDS
            .iter()
            .map(|id| kpi_card(*id, kpis))
            .collect(),
        lead_time: kpi_card(KpiId::LeadTime, kpis),
        supplier_lead_times: supplier_lead_times(kpis),
        charts: vec![ChartSlot::from_result(
            regions::CARRYING_COST,
            charts::carrying_cost_breakdown(kpis),
        )],
    }
}

pub fn analytics_view(snapshot: &Snapshot) -> AnalyticsView {
    let kpis = &snapshot.kpis;
    let abc = kpis.get(KpiId::AbcAnalysis).cloned().unwrap_or(Value::Null);
    let valuation = kpis
        .get(KpiId::InventoryValuation)
        .cloned()
        .unwrap_or(Value::Null);

    let abc_cards = ["A", "B", "C"]
        .iter()
        .map(|class| abc_card(class, &abc))
        .collect();

    let money = |field: &str| format::currency(num_field(&valuation, field).unwrap_or(0.0));
    let valuation_cards = vec![
        ValuationCard {
            label: "FIFO Method".to_string(),
            value: money("fifo_valuation"),
            subtitle: "First In First Out".to_string(),
        },
        ValuationCard {
            label: "Average Cost".to_string(),
            value: money("average_cost_valuation"),
            subtitle: "Simple Average".to_string(),
        },
        ValuationCard {
            label: "Weighted Avg".to_string(),
            value: money("weighted_average_valuation"),
            subtitle: "Quantity Weighted".to_string(),
        },
        ValuationCard {
            label: "Total Units".to_string(),
            value: format::thousands(num_field(&valuation, "total_units").unwrap_or(0.0)),
            subtitle: "All Warehouses".to_string(),
        },
    ];

    let charts = vec![
        ChartSlot::from_result(
            regions::SUPPLIER_PERFORMANCE,
            charts::supplier_performance(kpis),
        ),
        ChartSlot::from_result(regions::AGING_COUNT, charts::aging_item_counts(kpis)),
        ChartSlot::from_result(regions::AGING_VALUE, charts::aging_value(kpis)),
        ChartSlot::chart(
            regions::TRENDS,
            charts::transaction_trends(&snapshot.transactions),
        ),
    ];

    AnalyticsView {
        abc: abc_cards,
        valuation: valuation_cards,
        charts,
    }
}

pub fn forecasting_view(snapshot: &Snapshot) -> ForecastingView {
    let products = snapshot
        .stock
        .iter()
        .filter(|record| !record.sku.is_empty())
        .map(|record| ProductOption {
            sku: record.sku.clone(),
            name: record.product.clone(),
        })
        .collect();

    ForecastingView {
        products,
        periods: FORECAST_PERIOD_CHOICES.to_vec(),
        default_periods: 30,
        models: vec![
            ModelOption {
                value: ForecastModel::Auto.as_str(),
                label: "Auto Select",
            },
            ModelOption {
                value: ForecastModel::Simple.as_str(),
                label: "Simple Moving Avg",
            },
            ModelOption {
                value: ForecastModel::Xgboost.as_str(),
                label: "XGBoost",
            },
            ModelOption {
                value: ForecastModel::Prophet.as_str(),
                label: "Prophet",
            },
        ],
    }
}

pub fn details_view(
    snapshot: &Snapshot,
    filter: &TableFilter,
    sort: Option<(StockField, SortDirection)>,
) -> DetailsView {
    let filtered = shared::table::filter(&snapshot.stock, filter);
    let rows = match sort {
        Some((field, direction)) => shared::table::sort(&filtered, field, direction),
        None => filtered,
    };

    DetailsView {
        summary: shared::table::visible_summary(rows.len(), snapshot.stock.len()),
        warehouses: shared::table::warehouse_options(&snapshot.stock),
        rows,
    }
}

/// Forecast results assembled from a successful response.
pub fn forecast_view(response: &ForecastResponse) -> ForecastView {
    let rows = response
        .forecast
        .iter()
        .map(|point| ForecastRow {
            date: point.date_label().to_string(),
            forecast: format!("{}", point.forecast.round() as i64),
            lower: format!("{}", point.lower_bound.round() as i64),
            upper: format!("{}", point.upper_bound.round() as i64),
        })
        .collect();

    let summary = response.summary();
    let cards = vec![
        StatCard {
            label: "Total Demand".to_string(),
            value: format::thousands(summary.total_demand as f64),
            subtitle: format!("{} days", response.periods),
        },
        StatCard {
            label: "Avg Daily".to_string(),
            value: format::thousands(summary.average_demand as f64),
            subtitle: "units/day".to_string(),
        },
        StatCard {
            label: "Peak Demand".to_string(),
            value: format::thousands(summary.peak_demand as f64),
            subtitle: "max units".to_string(),
        },
        StatCard {
            label: "Model Used".to_string(),
            value: summary.model.clone(),
            subtitle: summary
                .mape
                .map(|mape| format!("MAPE: {}", format::percent(mape)))
                .unwrap_or_default(),
        },
    ];

    ForecastView {
        chart: charts::forecast_chart(response),
        summary,
        cards,
        periods: response.periods,
        rows,
    }
}

// ============================================================================
// Card builders
// ============================================================================

fn kpi_card(id: KpiId, kpis: &KpiBundle) -> KpiCard {
    let payload = kpis.get(id).cloned().unwrap_or(Value::Null);
    let num = |field: &str| num_field(&payload, field).unwrap_or(0.0);
    let count = |field: &str| format::number(num(field));

    let (value, subtitle) = match id {
        KpiId::InventoryTurnover => (
            format::multiplier(num("annual_turnover")),
            str_field(&payload, "interpretation").map(String::from),
        ),
        KpiId::DaysSalesInventory => (
            format::days(
                num_field(&payload, "dsi")
                    .or_else(|| num_field(&payload, "days_sales_inventory"))
                    .unwrap_or(0.0),
            ),
            str_field(&payload, "interpretation").map(String::from),
        ),
        KpiId::CarryingCost => (
            format::currency(num("annual_carrying_cost")),
            Some(format!("{} rate", format::percent(num("carrying_cost_rate")))),
        ),
        KpiId::DeadStockPercentage => (
            format::percent(num("dead_stock_percentage")),
            Some(format::currency(num("dead_stock_value"))),
        ),
        KpiId::InventoryShrinkage => (
            format::percent(num("shrinkage_rate")),
            Some(format!("{} loss", format::currency(num("shrinkage_value")))),
        ),
        KpiId::StockAccuracy => (
            format::percent(num("accuracy_rate")),
            Some(format!(
                "{}/{} items",
                count("accurate_items"),
                count("total_items")
            )),
        ),
        KpiId::StockoutRate => (
            format::percent(num("stockout_rate")),
            Some(format!("{} items affected", count("stockout_items"))),
        ),
        KpiId::OrderFulfillment => (
            format::percent(num("fulfillment_rate")),
            Some(format!(
                "{}/{} orders",
                count("fulfilled_orders"),
                count("total_orders")
            )),
        ),
        KpiId::BackorderRate => (
            format::percent(num("backorder_rate")),
            Some(format!("{} backorders", count("backorders"))),
        ),
        KpiId::FillRate => (
            format::percent(num("fill_rate")),
            Some(format!(
                "{}/{} in stock",
                count("items_in_stock"),
                count("total_items")
            )),
        ),
        KpiId::LeadTime => (
            format::days(
                num_field(&payload, "average_lead_time_days")
                    .or_else(|| num_field(&payload, "average_lead_time"))
                    .unwrap_or(0.0),
            ),
            Some(format!(
                "Min: {} | Max: {}",
                count("min_lead_time"),
                count("max_lead_time")
            )),
        ),
        // Analytics-tab KPIs never appear as cards; fall back to the
        // closed headline mapping so the match stays total.
        _ => (shared::detail::format_value(id, &payload), None),
    };

    KpiCard {
        id,
        label: id.label().to_string(),
        value,
        subtitle,
    }
}

fn supplier_lead_times(kpis: &KpiBundle) -> Vec<SupplierLeadTime> {
    let Some(by_supplier) = kpis
        .get(KpiId::LeadTime)
        .and_then(|payload| shared::obj_field(payload, "by_supplier"))
    else {
        return Vec::new();
    };

    by_supplier
        .iter()
        .map(|(supplier, days)| SupplierLeadTime {
            supplier: supplier.clone(),
            days: format::days(days.as_f64().unwrap_or(0.0)),
        })
        .collect()
}

fn abc_card(class: &str, abc: &Value) -> AbcClassCard {
    let category = abc
        .get(format!("category_{}", class))
        .cloned()
        .unwrap_or(Value::Null);
    let num = |field: &str| num_field(&category, field).unwrap_or(0.0);

    AbcClassCard {
        class_name: class.to_string(),
        items: format!("{} items", format::number(num("count"))),
        item_share: format!("{}% of items", format::number(num("percentage"))),
        value: format::currency(num("value")),
        value_share: format!("{}% of value", format::number(num("value_percentage"))),
    }
}
