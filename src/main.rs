mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::SalesDashApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut app = SalesDashApp::default();

    // Optional CLI argument: a data file to open on startup.
    if let Some(path) = std::env::args().nth(1) {
        app.state.load_path(Path::new(&path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SalesDash – Sales Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
