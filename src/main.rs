mod config;
mod engine;
mod model;
mod storage;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::config::AppConfig;
use crate::storage::{FileStore, StoreRef};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let files = FileStore::open(&config.data_dir)
        .with_context(|| format!("cannot open data dir {}", config.data_dir.display()))?;
    info!("data dir: {}", files.dir().display());
    let store: StoreRef = Arc::new(files);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HUD Chronicle",
        options,
        Box::new(move |cc| Ok(Box::new(ui::app::HudChronicleApp::new(cc, config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
