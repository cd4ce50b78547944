//! Stock Dashboard - Headless Runner
//!
//! Drives the full dashboard lifecycle against a live analytics service:
//! health probe, initial load, a render pass over every tab, one CSV
//! export, then the periodic refresh loop. Render calls come out as JSON
//! lines, so this doubles as a smoke check for the service and the
//! presentation pipeline.

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stock_dashboard_engine::api::ApiClient;
use stock_dashboard_engine::controller::{DashboardController, Tab};
use stock_dashboard_engine::render::TraceRenderer;
use stock_dashboard_engine::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stock_dashboard_engine=debug,sdb_headless=debug,render=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Stock Dashboard headless runner");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Analytics service: {}", config.api.base_url);

    let api = ApiClient::new(&config.api)?;

    tracing::info!("Probing analytics service health...");
    let health = api.health().await?;
    tracing::info!("Analytics service healthy: {}", health);

    let mut controller =
        DashboardController::new(api, TraceRenderer::default(), config.narrative.cogs_ratio);
    controller.init().await?;
    if let Some(snapshot) = controller.snapshot() {
        tracing::info!(
            "Snapshot loaded: {} products, {} transactions, last updated {}",
            snapshot.summary.total_products,
            snapshot.summary.total_transactions,
            snapshot.summary.last_updated
        );
    }

    // One render pass over every tab.
    for tab in Tab::ALL {
        controller.select_tab(tab.as_str())?;
    }

    // Export runs from the Details tab, last in the walk.
    controller.select_tab(Tab::Details.as_str())?;
    let export = controller.export_request()?;
    tokio::fs::create_dir_all(&config.export.directory).await?;
    let path = std::path::Path::new(&config.export.directory).join(&export.filename);
    tokio::fs::write(&path, &export.content).await?;
    tracing::info!("Wrote CSV export to {}", path.display());

    controller.select_tab(Tab::Overview.as_str())?;

    let mut interval = tokio::time::interval(Duration::from_secs(config.refresh.interval_secs));
    // The first tick completes immediately; consume it so the loop
    // waits a full interval before the first refresh.
    interval.tick().await;
    loop {
        interval.tick().await;
        controller.tick().await;
    }
}
