#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod io;
mod layout;
mod logging;
mod model;
mod ui;

use config::AppSettings;
use io::{FarmDataSource, JsonFileSource};

fn main() -> eframe::Result<()> {
    let settings_path = AppSettings::default_path();
    let settings = AppSettings::load_or_default(settings_path.as_deref());
    logging::init_logging(&settings.log_filter);

    // A farm file on the command line wins over the last opened one.
    let dataset = std::env::args_os()
        .nth(1)
        .map(std::path::PathBuf::from)
        .or_else(|| settings.last_dataset.clone());
    let source: Option<Box<dyn FarmDataSource>> = dataset.map(|path| {
        tracing::info!(path = %path.display(), "using farm data file");
        Box::new(JsonFileSource::new(path)) as Box<dyn FarmDataSource>
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Farm Gantt"),
        ..Default::default()
    };

    eframe::run_native(
        "Farm Gantt",
        options,
        Box::new(move |cc| Ok(Box::new(app::FarmGanttApp::new(cc, settings, settings_path, source)))),
    )
}
