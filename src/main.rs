#![cfg_attr(windows, windows_subsystem = "windows")]

use keylink::app::AppState;

fn main() -> eframe::Result<()> {
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size([560.0, 400.0])
        .with_min_inner_size([420.0, 260.0]);
    eframe::run_native(
        concat!("Keylink - v", env!("CARGO_PKG_VERSION")),
        native_options,
        Box::new(|_cc| Ok(Box::new(AppState::new()))),
    )
}
