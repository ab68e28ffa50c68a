mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DataTrackerApp;
use data_tracker::config::{CONFIG_ENV_VAR, DashboardConfig};
use data_tracker::data::load_file;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::resolve(
        std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        std::env::args_os().nth(1).map(PathBuf::from),
    )?;

    // The dataset is required before any view can be computed.
    let dataset = load_file(&config.dataset_path)
        .with_context(|| format!("loading {}", config.dataset_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Tracker – COVID-19 Data Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(DataTrackerApp::new(&config, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
