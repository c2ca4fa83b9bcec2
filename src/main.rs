//! NJ Public Library Data Explorer - desktop entry point
//!
//! Usage: `nj_library_explorer [DATA_DIR]`

use anyhow::Context;
use eframe::egui;
use nj_library_explorer::config::AppConfig;
use nj_library_explorer::gui::ExplorerApp;
use nj_library_explorer::logging;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config =
        AppConfig::load(std::env::args().skip(1)).context("could not load configuration")?;
    logging::init(&config.log_filter);
    info!(
        data_dir = %config.data_dir.display(),
        export_dir = %config.export_dir.display(),
        "starting explorer"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("NJ Public Library Data Explorer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "NJ Public Library Data Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
