use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn log_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("Keylink").join("keylink.log");
    }
    PathBuf::from("keylink.log")
}

pub fn log_line<P: AsRef<Path>>(path: P, line: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{} {line}", timestamp());
    }
}

fn timestamp() -> String {
    let now = match time::UtcOffset::current_local_offset() {
        Ok(offset) => time::OffsetDateTime::now_utc().to_offset(offset),
        Err(_) => time::OffsetDateTime::now_utc(),
    };
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
