//! Native GitHub Issues Browser
//!
//! A desktop app that renders saved issue searches as a sidebar tree
//! with milestone grouping and current-issue highlighting.

mod api;
mod app;
mod event;
mod issues;
mod settings;
mod theme;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_title("GitHub Issues"),
        persist_window: true, // Persist window state and egui memory between sessions
        ..Default::default()
    };

    eframe::run_native(
        "GitHub Issues",
        options,
        Box::new(|cc| Ok(Box::new(app::BrowserApp::new(cc)))),
    )
}
