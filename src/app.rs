use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Color32};

use crate::control::SshKeyControl;
use crate::fetch::HttpFetcher;
use crate::logger;
use crate::params::FileStore;

#[derive(Clone, Copy)]
struct PanelTheme {
    bg: Color32,
    fg: Color32,
    muted: Color32,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            bg: Color32::from_rgb(10, 12, 14),
            fg: Color32::from_rgb(220, 220, 220),
            muted: Color32::from_rgb(140, 150, 160),
        }
    }
}

pub struct AppState {
    theme: PanelTheme,
    ssh_keys: SshKeyControl,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            theme: PanelTheme::default(),
            ssh_keys: SshKeyControl::new(Box::new(FileStore::open()), Arc::new(HttpFetcher::new()))
                .with_log_path(logger::log_path()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ssh_keys.poll();

        let theme = self.theme;
        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(theme.bg)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                ui.visuals_mut().override_text_color = Some(theme.fg);
                ui.heading("Device settings");
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(12.0);
                self.ssh_keys.ui(ui, theme.muted);
            });

        self.ssh_keys.draw_dialogs(ctx);

        // Keep frames coming while a fetch is in flight so poll() runs.
        if self.ssh_keys.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
