//! Campaign Dashboard - Ads & Lead Performance Viewer
//!
//! Loads a Google Ads campaign report and the lead exports of each site,
//! then shows headline metrics, charts and a campaign table.

mod charts;
mod config;
mod data;
mod format;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, Context, Result};
use config::Config;
use data::{DataCache, DataProcessor, TableSort};
use eframe::egui;
use gui::DashboardApp;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let config = Config::load();
    init_tracing(&config.log_level);

    let cache = Arc::new(DataCache::new(config.sources()));

    if let Some(format) = config.output {
        let filters = config.filters()?;
        let data = cache.get().context("Failed to load dashboard data")?;
        let view = DataProcessor::build_view(&data, &filters, TableSort::default());
        println!("{}", report::render(&view, format)?);
        return Ok(());
    }

    tracing::info!(data_dir = %config.data_dir.display(), "starting dashboard window");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Campaign Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Campaign Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, cache)))),
    )
    .map_err(|e| anyhow!("Window error: {e}"))
}
