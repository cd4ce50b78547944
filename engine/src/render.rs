//! Renderer seam between the controller and whatever paints the views.
//!
//! View models cross this boundary fully computed; implementations only
//! materialize them. The browser shell implements this over the DOM, the
//! headless runner logs JSON lines, tests record calls.

use shared::detail::KpiDetailView;
use shared::ChartSpec;

use crate::controller::Tab;
use crate::view::{ForecastView, TabView};

pub trait Renderer {
    /// Phase 1: replace the tab's content region with the view model.
    fn render_tab(&mut self, tab: Tab, view: &TabView);

    /// Phase 2: fill one chart region. Only called after `render_tab`
    /// created the region.
    fn render_chart(&mut self, region: &str, spec: &ChartSpec);

    /// Phase 2 fallback when a chart has no data to plot.
    fn render_chart_placeholder(&mut self, region: &str, message: &str);

    fn render_kpi_detail(&mut self, detail: &KpiDetailView);

    fn render_forecast(&mut self, view: &ForecastView);

    /// Disable or re-enable the forecast trigger control.
    fn set_forecast_busy(&mut self, busy: bool);

    /// Dismissable error in the forecast results region.
    fn show_forecast_error(&mut self, message: &str);

    /// Full-page error shown when the initial load fails.
    fn show_fatal(&mut self, message: &str);

    fn set_last_updated(&mut self, text: &str);
}

/// Renderer for the headless runner: every call becomes a JSON line
/// under the `render` target, so a live analytics service can be
/// smoke-checked without a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRenderer;

impl TraceRenderer {
    fn emit(&self, event: &str, payload: &impl serde::Serialize) {
        match serde_json::to_string(payload) {
            Ok(json) => tracing::info!(target: "render", event, payload = %json),
            Err(error) => tracing::error!(target: "render", event, %error),
        }
    }
}

impl Renderer for TraceRenderer {
    fn render_tab(&mut self, tab: Tab, view: &TabView) {
        self.emit(
            "render_tab",
            &serde_json::json!({ "tab": tab.as_str(), "view": view }),
        );
    }

    fn render_chart(&mut self, region: &str, spec: &ChartSpec) {
        self.emit(
            "render_chart",
            &serde_json::json!({ "region": region, "spec": spec }),
        );
    }

    fn render_chart_placeholder(&mut self, region: &str, message: &str) {
        self.emit(
            "render_chart_placeholder",
            &serde_json::json!({ "region": region, "message": message }),
        );
    }

    fn render_kpi_detail(&mut self, detail: &KpiDetailView) {
        self.emit("render_kpi_detail", detail);
    }

    fn render_forecast(&mut self, view: &ForecastView) {
        self.emit("render_forecast", view);
    }

    fn set_forecast_busy(&mut self, busy: bool) {
        tracing::info!(target: "render", event = "set_forecast_busy", busy);
    }

    fn show_forecast_error(&mut self, message: &str) {
        tracing::warn!(target: "render", event = "show_forecast_error", message);
    }

    fn show_fatal(&mut self, message: &str) {
        tracing::error!(target: "render", event = "show_fatal", message);
    }

    fn set_last_updated(&mut self, text: &str) {
        tracing::info!(target: "render", event = "set_last_updated", text);
    }
}
