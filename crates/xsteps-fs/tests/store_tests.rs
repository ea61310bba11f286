use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use xsteps_fs::{ConfigMap, Error, ExtensionStore};

fn entry(key: &str, value: serde_json::Value) -> ConfigMap {
    ConfigMap::from([(key.to_string(), value)])
}

#[test]
fn test_open_creates_extension_directory() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join(".xsteps");

    let store = ExtensionStore::open(workspace.clone(), "cmake").unwrap();

    assert!(workspace.join("cmake").is_dir());
    assert_eq!(store.name(), "cmake");
    assert!(store.config_file().as_str().ends_with("cmake/config.yaml"));
    assert!(!store.config_file().exists());
}

#[test]
fn test_bootstrap_does_not_overwrite_existing_file() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();
    fs::write(store.config_file().to_native(), "run_command: cmake3\n").unwrap();

    let (config, created) = store
        .bootstrap(|| entry("run_command", json!("cmake")))
        .unwrap();

    assert!(!created);
    assert_eq!(config, entry("run_command", json!("cmake3")));
    assert_eq!(
        fs::read_to_string(store.config_file().to_native()).unwrap(),
        "run_command: cmake3\n"
    );
}

#[test]
fn test_bootstrap_surfaces_corrupt_config() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();
    fs::write(store.config_file().to_native(), "[not, a, mapping]\n").unwrap();

    let err = store
        .bootstrap(|| entry("run_command", json!("cmake")))
        .unwrap_err();

    assert!(matches!(err, Error::ConfigCorrupt { .. }), "got: {err:?}");
    assert_eq!(
        fs::read_to_string(store.config_file().to_native()).unwrap(),
        "[not, a, mapping]\n",
        "a corrupt file is never replaced by the default"
    );
}

#[test]
fn test_append_config_adds_new_keys() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();
    store.save_config(&entry("run_command", json!("cmake"))).unwrap();

    let merged = store
        .append_config(&entry("installed", json!(true)), false)
        .unwrap();

    assert_eq!(merged.len(), 2);
    assert_eq!(store.load_config().unwrap(), merged);
}

#[test]
fn test_append_config_rejects_collision_and_keeps_file() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();
    store.save_config(&entry("run_command", json!("cmake"))).unwrap();
    let before = fs::read_to_string(store.config_file().to_native()).unwrap();

    let err = store
        .append_config(&entry("run_command", json!("cmake")), false)
        .unwrap_err();

    assert!(matches!(err, Error::OverrideRejected { collisions: 1, .. }));
    assert_eq!(
        fs::read_to_string(store.config_file().to_native()).unwrap(),
        before
    );
}

#[test]
fn test_append_config_with_override_replaces_value() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();
    store.save_config(&entry("run_command", json!("cmake"))).unwrap();

    store
        .append_config(&entry("run_command", json!("cmake3")), true)
        .unwrap();

    assert_eq!(
        store.load_config().unwrap(),
        entry("run_command", json!("cmake3"))
    );
}

#[test]
fn test_file_resolves_inside_extension_directory() {
    let temp = TempDir::new().unwrap();
    let store = ExtensionStore::open(temp.path(), "cmake").unwrap();

    let manifest = store.file("environment.ps1.env");
    assert_eq!(manifest.parent().as_ref(), Some(store.path()));
}
