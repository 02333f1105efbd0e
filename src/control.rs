use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use eframe::egui::{self, Align2, Vec2};

use crate::fetch::{FetchResult, KeyFetcher};
use crate::logger;
use crate::params::SettingsStore;

pub const GITHUB_USERNAME_KEY: &str = "GithubUsername";
pub const GITHUB_SSH_KEYS_KEY: &str = "GithubSshKeys";

const CONTROL_TITLE: &str = "SSH keys";
const CONTROL_WARNING: &str = "Warning: this grants SSH access to all public keys \
    in your GitHub settings. Never enter a GitHub username other than your own.";

/// Whether a GitHub account is currently linked, derived from the store on
/// every `refresh`. `Loading` only exists while a fetch is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    Loading,
    Linked,
}

struct FetchDone {
    username: String,
    result: FetchResult,
}

struct UsernamePopup {
    value: String,
    just_opened: bool,
}

/// Settings control that links a GitHub username and its published SSH keys
/// to the device.
///
/// Linked means both `GithubUsername` and `GithubSshKeys` are present in the
/// store; they are written together on a successful fetch and removed
/// together on unlink. The button shows "Add" when unlinked, "Remove" when
/// linked, and "Loading" (disabled) while a fetch is running.
pub struct SshKeyControl {
    store: Box<dyn SettingsStore>,
    fetcher: Arc<dyn KeyFetcher>,
    state: LinkState,
    username_label: String,
    enabled: bool,
    fetch_rx: Option<Receiver<FetchDone>>,
    input_popup: Option<UsernamePopup>,
    alert: Option<String>,
    log_path: Option<PathBuf>,
}

impl SshKeyControl {
    pub fn new(store: Box<dyn SettingsStore>, fetcher: Arc<dyn KeyFetcher>) -> Self {
        let mut control = Self {
            store,
            fetcher,
            state: LinkState::Unlinked,
            username_label: String::new(),
            enabled: true,
            fetch_rx: None,
            input_popup: None,
            alert: None,
            log_path: None,
        };
        control.refresh();
        control
    }

    /// Enable logging of link/unlink events to the given file. Without this
    /// the control stays silent.
    pub fn with_log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    fn log(&self, line: &str) {
        if let Some(path) = &self.log_path {
            logger::log_line(path, line);
        }
    }

    /// Re-derive the displayed state from the store and re-enable the control.
    pub fn refresh(&mut self) {
        let keys = self.store.get(GITHUB_SSH_KEYS_KEY);
        if !keys.is_empty() {
            self.username_label = self.store.get(GITHUB_USERNAME_KEY);
            self.state = LinkState::Linked;
        } else {
            self.username_label.clear();
            self.state = LinkState::Unlinked;
        }
        self.enabled = true;
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            LinkState::Unlinked => "Add",
            LinkState::Loading => "Loading",
            LinkState::Linked => "Remove",
        }
    }

    /// The linked username, empty when unlinked.
    pub fn username(&self) -> &str {
        &self.username_label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_busy(&self) -> bool {
        self.state == LinkState::Loading
    }

    pub fn input_open(&self) -> bool {
        self.input_popup.is_some()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Button press. Linked: unlink immediately. Unlinked: ask for a username.
    pub fn click(&mut self) {
        if !self.enabled {
            return;
        }
        match self.state {
            LinkState::Linked => {
                self.store.remove(GITHUB_USERNAME_KEY);
                self.store.remove(GITHUB_SSH_KEYS_KEY);
                self.log("Unlinked GitHub account.");
                self.refresh();
            }
            LinkState::Unlinked => {
                self.input_popup = Some(UsernamePopup {
                    value: String::new(),
                    just_opened: true,
                });
            }
            LinkState::Loading => {}
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_popup = None;
    }

    /// Username dialog result. An empty submission is treated like a cancel.
    pub fn submit_username(&mut self, username: &str) {
        self.input_popup = None;
        if username.is_empty() {
            return;
        }
        self.state = LinkState::Loading;
        self.enabled = false;
        self.start_fetch(username.to_string());
    }

    fn start_fetch(&mut self, username: String) {
        let (tx, rx) = mpsc::channel::<FetchDone>();
        self.fetch_rx = Some(rx);

        let fetcher = Arc::clone(&self.fetcher);
        std::thread::spawn(move || {
            let result = fetcher.fetch_keys(&username);
            let _ = tx.send(FetchDone { username, result });
        });
    }

    /// Drain the fetch channel; call once per frame.
    pub fn poll(&mut self) {
        let Some(rx) = self.fetch_rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(done) => {
                self.fetch_rx = None;
                self.apply_fetch_done(done);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting; recover rather than staying
                // stuck in Loading.
                self.fetch_rx = None;
                self.alert = Some("Request failed".to_string());
                self.log("Key fetch worker exited without a result.");
                self.refresh();
            }
        }
    }

    fn apply_fetch_done(&mut self, done: FetchDone) {
        let FetchDone { username, result } = done;
        if result.success {
            if !result.body.is_empty() {
                self.store.put(GITHUB_USERNAME_KEY, &username);
                self.store.put(GITHUB_SSH_KEYS_KEY, &result.body);
                self.log(&format!("Linked GitHub account {username:?}."));
            } else {
                self.alert = Some(format!("Username '{username}' has no keys on GitHub"));
            }
        } else if result.timed_out {
            self.alert = Some("Request timed out".to_string());
        } else {
            self.alert = Some(format!("Username '{username}' doesn't exist on GitHub"));
        }
        self.refresh();
    }

    /// The settings row: title + warning on the left, username and the
    /// Add/Remove button on the right.
    pub fn ui(&mut self, ui: &mut egui::Ui, muted: egui::Color32) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(CONTROL_TITLE).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clicked = ui
                    .add_enabled(self.enabled, egui::Button::new(self.button_label()))
                    .clicked();
                if !self.username_label.is_empty() {
                    ui.label(egui::RichText::new(&self.username_label).color(muted));
                }
                if clicked {
                    self.click();
                }
            });
        });
        ui.label(egui::RichText::new(CONTROL_WARNING).small().color(muted));
    }

    /// Username input popup and alert popup (global, drawn over the panel).
    pub fn draw_dialogs(&mut self, ctx: &egui::Context) {
        let mut submit_action: Option<String> = None;
        let mut close_popup = false;
        if let Some(popup) = &mut self.input_popup {
            let mut open = true;
            egui::Window::new("Link GitHub account")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label("Enter your GitHub username:");
                    let resp = ui.text_edit_singleline(&mut popup.value);
                    if popup.just_opened {
                        resp.request_focus();
                        popup.just_opened = false;
                    }

                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter {
                        submit_action = Some(popup.value.clone());
                        close_popup = true;
                    }

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            close_popup = true;
                        }
                        if ui.button("Add").clicked() {
                            submit_action = Some(popup.value.clone());
                            close_popup = true;
                        }
                    });
                });

            if !open {
                close_popup = true;
            }
        }
        if close_popup {
            self.input_popup = None;
        }
        if let Some(username) = submit_action {
            self.submit_username(&username);
        }

        let mut dismiss = false;
        if let Some(message) = &self.alert {
            let mut open = true;
            egui::Window::new("SSH keys")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
            if !open {
                dismiss = true;
            }
        }
        if dismiss {
            self.alert = None;
        }
    }
}
