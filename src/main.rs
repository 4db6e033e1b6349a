//! Electro Bench - signal generator and electronics calculators
//!
//! Entry point for the application.

use eframe::egui;

use electro_bench::app::BenchApp;
use electro_bench::config::AppConfig;

fn main() -> eframe::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = AppConfig::load();
    log::info!("Starting Electro Bench v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 480.0])
            .with_title("Electro Bench"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Electro Bench",
        options,
        Box::new(move |_cc| Ok(Box::new(BenchApp::new(&config)))),
    );
    if let Err(e) = &result {
        log::error!("Application failed: {}", e);
    }
    result
}
