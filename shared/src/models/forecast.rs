//! Demand forecast request and response types.

use serde::{Deserialize, Serialize};

/// Forecast horizons the backend accepts, in days.
pub const FORECAST_PERIOD_CHOICES: [u32; 5] = [7, 14, 30, 60, 90];

/// Parameters for one forecast run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// SKU to forecast; `None` aggregates demand across all products.
    pub product_id: Option<String>,
    pub periods: u32,
    pub model: ForecastModel,
}

/// Forecasting model selector. `Auto` lets the backend pick by history size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    #[default]
    Auto,
    Simple,
    Xgboost,
    Prophet,
}

impl ForecastModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::Auto => "auto",
            ForecastModel::Simple => "simple",
            ForecastModel::Xgboost => "xgboost",
            ForecastModel::Prophet => "prophet",
        }
    }

    pub fn parse(raw: &str) -> Option<ForecastModel> {
        match raw {
            "auto" => Some(ForecastModel::Auto),
            "simple" => Some(ForecastModel::Simple),
            "xgboost" => Some(ForecastModel::Xgboost),
            "prophet" => Some(ForecastModel::Prophet),
            _ => None,
        }
    }
}

/// Forecast series with the model the backend ultimately ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastResponse {
    pub product_id: Option<String>,
    pub periods: u32,
    /// Backend-reported model name, e.g. "XGBoost" or "Ensemble".
    pub model: String,
    pub metrics: Option<ForecastMetrics>,
    pub forecast: Vec<ForecastPoint>,
}

/// Backtest accuracy metrics; all optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastMetrics {
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub mape: Option<f64>,
    pub train_size: Option<u64>,
    pub test_size: Option<u64>,
}

/// One forecast day with its confidence band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPoint {
    /// ISO timestamp or bare date; kept as sent.
    pub date: String,
    pub forecast: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    /// Date portion of the timestamp, for axis labels and table rows.
    pub fn date_label(&self) -> &str {
        self.date
            .splitn(2, |c| c == 'T' || c == ' ')
            .next()
            .unwrap_or(&self.date)
    }
}

/// Display summary derived from a forecast series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub total_demand: i64,
    pub average_demand: i64,
    pub peak_demand: i64,
    pub model: String,
    pub mape: Option<f64>,
}

impl ForecastResponse {
    /// Rounded headline metrics for the results panel.
    pub fn summary(&self) -> ForecastSummary {
        let total: f64 = self.forecast.iter().map(|p| p.forecast).sum();
        let average = if self.forecast.is_empty() {
            0.0
        } else {
            total / self.forecast.len() as f64
        };
        let peak = self
            .forecast
            .iter()
            .map(|p| p.forecast)
            .fold(0.0_f64, f64::max);

        ForecastSummary {
            total_demand: total.round() as i64,
            average_demand: average.round() as i64,
            peak_demand: peak.round() as i64,
            model: self.model.clone(),
            mape: self.metrics.as_ref().and_then(|m| m.mape),
        }
    }
}
