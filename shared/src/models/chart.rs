//! Chart specifications handed to the charting capability.
//!
//! A spec carries the data series and minimal layout hints; colors,
//! fonts, and interaction belong to whatever library renders it.

use serde::{Deserialize, Serialize};

/// Stable container identifiers the renderer addresses charts by.
pub mod regions {
    pub const STOCK_STATUS: &str = "chart-stock-status";
    pub const CATEGORY: &str = "chart-category";
    pub const WAREHOUSE: &str = "chart-warehouse";
    pub const TOP_PRODUCTS: &str = "chart-top-products";
    pub const CARRYING_COST: &str = "chart-carrying-cost";
    pub const SUPPLIER_PERFORMANCE: &str = "chart-supplier-performance";
    pub const AGING_COUNT: &str = "chart-aging-count";
    pub const AGING_VALUE: &str = "chart-aging-value";
    pub const TRENDS: &str = "chart-trends";
    pub const FORECAST: &str = "forecast-chart";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub series: Vec<Series>,
    pub layout: Layout,
}

/// One plottable series. Labels stay on `x` even for horizontal bars; the
/// orientation hint tells the renderer to swap axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    Bar {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        x: Vec<String>,
        y: Vec<f64>,
        #[serde(default)]
        horizontal: bool,
    },
    Line {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        x: Vec<String>,
        y: Vec<f64>,
        /// Plot against the secondary y axis.
        #[serde(default)]
        secondary_axis: bool,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        #[serde(default)]
        hole: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Layout {
    pub fn titled(title: &str) -> Layout {
        Layout {
            title: title.to_string(),
            ..Layout::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_tagged_encoding() {
        let series = Series::Pie {
            labels: vec!["Critical".to_string()],
            values: vec![2.0],
            hole: 0.4,
        };
        let encoded = serde_json::to_value(&series).unwrap();
        assert_eq!(encoded["type"], "pie");
        assert_eq!(encoded["hole"], 0.4);
    }

    #[test]
    fn test_layout_omits_empty_hints() {
        let layout = Layout::titled("Trends");
        let encoded = serde_json::to_string(&layout).unwrap();
        assert!(!encoded.contains("y2_title"));
        assert!(encoded.contains("Trends"));
    }
}
