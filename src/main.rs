#![warn(clippy::all, rust_2018_idioms)]

use raster_paint::{PaintApp, PaintConfig};

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "PAINT_CONFIG";

fn load_config() -> PaintConfig {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => PaintConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("Ignoring {}: {}", CONFIG_ENV, err);
            PaintConfig::default()
        }),
        None => PaintConfig::default(),
    }
}

fn main() -> eframe::Result {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = load_config();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.canvas_width.min(1280) as f32 + 40.0,
                config.canvas_height.min(900) as f32 + 120.0,
            ])
            .with_title("Raster Paint"),
        ..Default::default()
    };

    eframe::run_native(
        "raster_paint",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, config)))),
    )
}
