//! KPI identifiers and their loosely typed analytic payloads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The closed set of KPI identifiers served by the analytics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiId {
    InventoryTurnover,
    DaysSalesInventory,
    StockAccuracy,
    StockoutRate,
    OrderFulfillment,
    CarryingCost,
    DeadStockPercentage,
    BackorderRate,
    FillRate,
    InventoryShrinkage,
    LeadTime,
    AbcAnalysis,
    InventoryValuation,
    SupplierPerformance,
    ItemAging,
}

impl KpiId {
    pub const ALL: [KpiId; 15] = [
        KpiId::InventoryTurnover,
        KpiId::DaysSalesInventory,
        KpiId::StockAccuracy,
        KpiId::StockoutRate,
        KpiId::OrderFulfillment,
        KpiId::CarryingCost,
        KpiId::DeadStockPercentage,
        KpiId::BackorderRate,
        KpiId::FillRate,
        KpiId::InventoryShrinkage,
        KpiId::LeadTime,
        KpiId::AbcAnalysis,
        KpiId::InventoryValuation,
        KpiId::SupplierPerformance,
        KpiId::ItemAging,
    ];

    /// Wire identifier, as used in endpoint paths and bundle keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiId::InventoryTurnover => "inventory_turnover",
            KpiId::DaysSalesInventory => "days_sales_inventory",
            KpiId::StockAccuracy => "stock_accuracy",
            KpiId::StockoutRate => "stockout_rate",
            KpiId::OrderFulfillment => "order_fulfillment",
            KpiId::CarryingCost => "carrying_cost",
            KpiId::DeadStockPercentage => "dead_stock_percentage",
            KpiId::BackorderRate => "backorder_rate",
            KpiId::FillRate => "fill_rate",
            KpiId::InventoryShrinkage => "inventory_shrinkage",
            KpiId::LeadTime => "lead_time",
            KpiId::AbcAnalysis => "abc_analysis",
            KpiId::InventoryValuation => "inventory_valuation",
            KpiId::SupplierPerformance => "supplier_performance",
            KpiId::ItemAging => "item_aging",
        }
    }

    /// Human-readable card label.
    pub fn label(&self) -> &'static str {
        match self {
            KpiId::InventoryTurnover => "Inventory Turnover",
            KpiId::DaysSalesInventory => "Days Sales Inventory",
            KpiId::StockAccuracy => "Stock Accuracy",
            KpiId::StockoutRate => "Stockout Rate",
            KpiId::OrderFulfillment => "Order Fulfillment",
            KpiId::CarryingCost => "Carrying Cost",
            KpiId::DeadStockPercentage => "Dead Stock",
            KpiId::BackorderRate => "Backorder Rate",
            KpiId::FillRate => "Fill Rate",
            KpiId::InventoryShrinkage => "Inventory Shrinkage",
            KpiId::LeadTime => "Average Lead Time",
            KpiId::AbcAnalysis => "ABC Analysis",
            KpiId::InventoryValuation => "Inventory Valuation",
            KpiId::SupplierPerformance => "Supplier Performance",
            KpiId::ItemAging => "Item Aging",
        }
    }
}

impl fmt::Display for KpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown KPI identifier: {0}")]
pub struct UnknownKpiId(pub String);

impl FromStr for KpiId {
    type Err = UnknownKpiId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KpiId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownKpiId(s.to_string()))
    }
}

/// Precomputed KPI payloads keyed by wire identifier.
///
/// Payload shapes are KPI-specific and stay opaque beyond the named
/// fields the presenters read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiBundle(pub BTreeMap<String, Value>);

impl KpiBundle {
    pub fn get(&self, id: KpiId) -> Option<&Value> {
        self.0.get(id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Numeric field read that accepts numbers or numeric strings.
pub fn num_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

pub fn obj_field<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}
