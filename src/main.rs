#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod data;
mod error;
mod map;
mod session;
mod ui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(1440.0, 900.0))
            .with_min_inner_size(egui::vec2(640.0, 480.0))
            .with_title("VisitMap")
            .with_resizable(true)
            .with_decorations(true),
        ..Default::default()
    };

    let config = config::Config::from_env();

    eframe::run_native(
        "VisitMap",
        native_options,
        Box::new(|cc| Ok(Box::new(ui::app::App::new(cc, config)))),
    )
}
