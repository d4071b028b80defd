// Configuration tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use tempfile::Builder;

use rust_eda_service::data::SchemaBuilder;
use rust_eda_service::storage::DataStorage;
use rust_eda_service::utils::{AppError, Config, DEFAULT_MAX_UPLOAD_BYTES};
use rust_eda_service::DataSet;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_config_with_defaults() {
    let file = write_config(
        ".yaml",
        "server:\n  port: 9000\nstorage:\n  type: cache\n  capacity: 2\n  cache_ttl: 60\n",
    );
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(config.storage.type_, "cache");
    assert_eq!(config.storage.cache_ttl, Some(60));
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);

    // The cache backend honours its capacity
    let storage = config.storage.build().unwrap();
    let empty = || DataSet::new(SchemaBuilder::new().add_integer("x", false).build());
    for name in ["a", "b", "c"] {
        storage.store(name, empty()).unwrap();
    }
    assert_eq!(storage.list().unwrap(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn test_json_config() {
    let file = write_config(".json", r#"{"logging": {"level": "debug"}, "server": {"workers": 3}}"#);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.server.worker_count(), 3);
    assert_eq!(config.storage.type_, "memory");
}

#[test]
fn test_invalid_configs_are_rejected() {
    let toml = write_config(".toml", "port = 1");
    assert!(matches!(Config::from_file(toml.path()), Err(AppError::Config(_))));

    let zero = write_config(".json", r#"{"storage": {"capacity": 0}}"#);
    assert!(matches!(Config::from_file(zero.path()), Err(AppError::Config(_))));

    let mut config = Config::default();
    config.storage.type_ = "disk".to_string();
    assert!(matches!(config.storage.build(), Err(AppError::Config(_))));
}
