use keylink::params::{FileStore, SettingsStore};
use tempfile::tempdir;

#[test]
fn put_get_remove_roundtrip() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open_at(dir.path().join("settings.json"));

    assert_eq!(store.get("GithubUsername"), "");

    store.put("GithubUsername", "octocat");
    assert_eq!(store.get("GithubUsername"), "octocat");

    store.remove("GithubUsername");
    assert_eq!(store.get("GithubUsername"), "");
}

#[test]
fn values_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = FileStore::open_at(&path);
    store.put("GithubUsername", "octocat");
    store.put("GithubSshKeys", "ssh-rsa AAA...\nssh-ed25519 BBB...");
    drop(store);

    let store = FileStore::open_at(&path);
    assert_eq!(store.get("GithubUsername"), "octocat");
    assert_eq!(store.get("GithubSshKeys"), "ssh-rsa AAA...\nssh-ed25519 BBB...");
}

#[test]
fn overwrite_replaces_value() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open_at(dir.path().join("settings.json"));

    store.put("GithubUsername", "octocat");
    store.put("GithubUsername", "monalisa");
    assert_eq!(store.get("GithubUsername"), "monalisa");
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::open_at(dir.path().join("nope.json"));
    assert_eq!(store.get("GithubSshKeys"), "");
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, b"not json at all {").unwrap();

    let store = FileStore::open_at(&path);
    assert_eq!(store.get("GithubUsername"), "");
}

#[test]
fn remove_of_missing_key_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut store = FileStore::open_at(&path);
    store.remove("GithubUsername");
    assert!(!path.exists());
}

#[test]
fn creates_parent_directory_on_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut store = FileStore::open_at(&path);
    store.put("GithubUsername", "octocat");
    assert!(path.exists());

    let reopened = FileStore::open_at(&path);
    assert_eq!(reopened.get("GithubUsername"), "octocat");
}
