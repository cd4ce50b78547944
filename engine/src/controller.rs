//! Dashboard controller: UI state machine and data orchestration.
//!
//! The controller owns the mutable state (active tab, filter, sort,
//! sidebar) and the loaded snapshot; everything it hands the renderer
//! is an immutable, fully computed view model. Consistency comes from
//! atomic `Arc<Snapshot>` replacement, never from field-level merging.

use std::sync::Arc;

use chrono::Utc;

use shared::detail;
use shared::table::{self, SortDirection, StockField, TableFilter};
use shared::{ForecastRequest, KpiId, Snapshot};

use crate::api::AnalyticsApi;
use crate::error::{AppError, AppResult};
use crate::render::Renderer;
use crate::view::{self, CsvExport, SlotContent, TabView};

/// Dashboard tabs, addressed by their stable region ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Kpis,
    Analytics,
    Forecasting,
    Details,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Kpis,
        Tab::Analytics,
        Tab::Forecasting,
        Tab::Details,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "stock-overview",
            Tab::Kpis => "kpis",
            Tab::Analytics => "analytics",
            Tab::Forecasting => "forecasting",
            Tab::Details => "details",
        }
    }

    pub fn parse(raw: &str) -> Option<Tab> {
        match raw {
            "stock-overview" => Some(Tab::Overview),
            "kpis" => Some(Tab::Kpis),
            "analytics" => Some(Tab::Analytics),
            "forecasting" => Some(Tab::Forecasting),
            "details" => Some(Tab::Details),
            _ => None,
        }
    }
}

/// Mutable UI state; touched only inside transition handlers.
#[derive(Debug, Clone)]
struct UiState {
    active_tab: Tab,
    sidebar_open: bool,
    filter: TableFilter,
    sort: Option<(StockField, SortDirection)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Overview,
            sidebar_open: true,
            filter: TableFilter::default(),
            sort: None,
        }
    }
}

enum LoadState {
    Loading,
    Ready(Arc<Snapshot>),
    Error,
}

pub struct DashboardController<A, R> {
    api: A,
    renderer: R,
    cogs_ratio: f64,
    state: LoadState,
    ui: UiState,
}

impl<A: AnalyticsApi, R: Renderer> DashboardController<A, R> {
    pub fn new(api: A, renderer: R, cogs_ratio: f64) -> Self {
        Self {
            api,
            renderer,
            cogs_ratio,
            state: LoadState::Loading,
            ui: UiState::default(),
        }
    }

    /// Initial load. Failure is fatal: the renderer shows a full-page
    /// error and the controller stays unloaded until `init` succeeds.
    pub async fn init(&mut self) -> AppResult<()> {
        self.state = LoadState::Loading;
        match self.api.dashboard(false).await {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                self.render_current_tab();
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Error;
                self.renderer.show_fatal(&e.user_message());
                Err(e)
            }
        }
    }

    /// Periodic refresh. Runs only once loaded; a failed refresh keeps
    /// the current snapshot and is never surfaced to the user.
    pub async fn tick(&mut self) {
        if !self.is_ready() {
            return;
        }
        match self.api.dashboard(true).await {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                self.render_current_tab();
            }
            Err(e) => {
                tracing::warn!("Periodic refresh failed, keeping current snapshot: {}", e);
            }
        }
    }

    /// Switch tabs by region id and re-render.
    pub fn select_tab(&mut self, raw: &str) -> AppResult<()> {
        let tab = Tab::parse(raw)
            .ok_or_else(|| AppError::ValidationRejected(format!("unknown tab '{}'", raw)))?;
        self.ensure_ready()?;
        self.ui.active_tab = tab;
        self.render_current_tab();
        Ok(())
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.ui.sidebar_open = !self.ui.sidebar_open;
        self.ui.sidebar_open
    }

    /// Replace the table filter; valid only while Details is active.
    pub fn apply_filter(&mut self, filter: TableFilter) -> AppResult<()> {
        self.ensure_details_active()?;
        self.ui.filter = filter;
        self.render_current_tab();
        Ok(())
    }

    /// Sort by a column; sorting the same column again flips direction.
    pub fn apply_sort(&mut self, field: StockField) -> AppResult<()> {
        self.ensure_details_active()?;
        let direction = match self.ui.sort {
            Some((current, SortDirection::Ascending)) if current == field => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.ui.sort = Some((field, direction));
        self.render_current_tab();
        Ok(())
    }

    /// Export the full snapshot stock as CSV, in snapshot order. The
    /// current filter and sort do not apply.
    pub fn export_request(&mut self) -> AppResult<CsvExport> {
        let snapshot = self.ensure_details_active()?;
        let content = table::export_csv(&snapshot.stock)?;
        Ok(CsvExport {
            filename: table::export_filename(Utc::now().date_naive()),
            content,
        })
    }

    /// Run the forecast workflow: validate, disable the trigger, call
    /// the service, re-enable the trigger on every outcome.
    pub async fn request_forecast(&mut self, request: ForecastRequest) -> AppResult<()> {
        self.ensure_ready()?;
        shared::validate_forecast_request(&request)
            .map_err(|msg| AppError::ValidationRejected(msg.to_string()))?;

        self.renderer.set_forecast_busy(true);
        let outcome = self.api.forecast(&request).await;
        self.renderer.set_forecast_busy(false);

        match outcome {
            Ok(response) => {
                self.renderer.render_forecast(&view::forecast_view(&response));
                Ok(())
            }
            Err(e) => {
                self.renderer.show_forecast_error(&e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch one KPI's detail payload and present it. A failed fetch
    /// leaves the detail view closed; the dashboard is unaffected.
    pub async fn show_kpi_detail(&mut self, id: KpiId) {
        let snapshot = match self.ensure_ready() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!("Ignoring detail request: {}", e);
                return;
            }
        };
        match self.api.kpi_detail(id).await {
            Ok(payload) => {
                let detail = detail::present(id, &payload, &snapshot.stock, self.cogs_ratio);
                self.renderer.render_kpi_detail(&detail);
            }
            Err(e) => {
                tracing::error!("Detail fetch for {} failed: {}", id, e);
            }
        }
    }

    /// Recompute and fully replace the active tab's content: the tab
    /// view first, then each chart region it declared.
    pub fn render_current_tab(&mut self) {
        let Ok(snapshot) = self.ensure_ready() else {
            return;
        };
        let tab = self.ui.active_tab;
        let view = self.build_view(&snapshot, tab);
        self.renderer.render_tab(tab, &view);
        for slot in view.chart_slots() {
            match &slot.content {
                SlotContent::Chart { spec } => self.renderer.render_chart(slot.region, spec),
                SlotContent::Placeholder { message } => {
                    self.renderer.render_chart_placeholder(slot.region, message)
                }
            }
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.ui.active_tab
    }

    pub fn sidebar_open(&self) -> bool {
        self.ui.sidebar_open
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// The currently installed snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match &self.state {
            LoadState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn install_snapshot(&mut self, snapshot: Snapshot) {
        let last_updated = if snapshot.summary.last_updated.is_empty() {
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            snapshot.summary.last_updated.clone()
        };
        self.state = LoadState::Ready(Arc::new(snapshot));
        self.renderer.set_last_updated(&last_updated);
    }

    fn build_view(&self, snapshot: &Snapshot, tab: Tab) -> TabView {
        match tab {
            Tab::Overview => TabView::Overview(view::overview_view(snapshot)),
            Tab::Kpis => TabView::Kpis(view::kpi_tab_view(snapshot)),
            Tab::Analytics => TabView::Analytics(view::analytics_view(snapshot)),
            Tab::Forecasting => TabView::Forecasting(view::forecasting_view(snapshot)),
            Tab::Details => TabView::Details(view::details_view(
                snapshot,
                &self.ui.filter,
                self.ui.sort,
            )),
        }
    }

    fn ensure_ready(&self) -> AppResult<Arc<Snapshot>> {
        match &self.state {
            LoadState::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            _ => Err(AppError::ValidationRejected(
                "no snapshot loaded".to_string(),
            )),
        }
    }

    fn ensure_details_active(&self) -> AppResult<Arc<Snapshot>> {
        let snapshot = self.ensure_ready()?;
        if self.ui.active_tab != Tab::Details {
            return Err(AppError::ValidationRejected(
                "details tab is not active".to_string(),
            ));
        }
        Ok(snapshot)
    }
}
