use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::logger;

/// Key-value settings store for device configuration.
///
/// Keys map to strings; `get` on an absent key returns an empty string.
/// Injected into UI controls so tests can substitute an in-memory double.
pub trait SettingsStore {
    fn get(&self, key: &str) -> String;
    fn put(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

fn config_dir() -> Option<PathBuf> {
    // Stable per-user location, e.g. ~/.config/Keylink/settings.json.
    dirs::config_dir().map(|p| p.join("Keylink"))
}

pub fn settings_path() -> PathBuf {
    if let Some(dir) = config_dir() {
        return dir.join("settings.json");
    }
    PathBuf::from("settings.json")
}

/// On-disk store: a flat JSON object, rewritten in full on every change.
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    pub fn open() -> Self {
        Self::open_at(settings_path())
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        // A missing or unparseable file loads as an empty store.
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, String>>(&bytes).unwrap_or_default(),
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let json = serde_json::to_vec_pretty(&self.values).context("serialize settings")?;

        // Best-effort atomic write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).with_context(|| format!("write {}", tmp.display()))?;
        if fs::rename(&tmp, &self.path).is_err() {
            // If rename fails (e.g. cross-device), fall back.
            fs::write(&self.path, &json).with_context(|| format!("write {}", self.path.display()))?;
            let _ = fs::remove_file(&tmp);
        }
        Ok(())
    }

    fn persist_or_log(&self) {
        if let Err(err) = self.persist() {
            logger::log_line(logger::log_path(), &format!("Settings write failed: {err:#}"));
        }
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    fn put(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist_or_log();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist_or_log();
        }
    }
}
