#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Study Ink")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };
    eframe::run_native(
        study_ink::app::APP_ID,
        native_options,
        Box::new(|cc| Ok(Box::new(study_ink::StudyInkApp::new(cc)))),
    )
}

// The web build is started from JavaScript through `eframe::WebRunner`.
#[cfg(target_arch = "wasm32")]
fn main() {}
