//! Unit Tests for Configuration Loading

use sage_relay::config::loader::{ConfigLoader, LoadOptions};
use sage_relay::{Config, Error};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_loads_toml_from_search_path() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[transport]\nport = 9100\n\n[ui]\nfooter_height = 40.0\n",
    )
    .unwrap();

    let mut loader = ConfigLoader::with_search_paths(vec![dir.path().join("config")]);
    let config = loader.load_with(LoadOptions::default()).unwrap();

    assert_eq!(config.transport.port, 9100);
    assert_eq!(config.ui.footer_height, 40.0);
    assert_eq!(config.topics.instream, "event:instream");
    assert_eq!(loader.current_path(), Some(dir.path().join("config.toml").as_path()));
}

#[test]
fn test_loads_json_when_no_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"transport": {"local_host": "127.0.0.1"}}"#,
    )
    .unwrap();

    let mut loader = ConfigLoader::with_search_paths(vec![dir.path().join("config")]);
    let config = loader.load_with(LoadOptions::default()).unwrap();
    assert_eq!(config.transport.local_host, "127.0.0.1");
}

#[test]
fn test_missing_config_falls_back_or_errors() {
    let dir = TempDir::new().unwrap();
    let paths = vec![dir.path().join("config")];

    let config = ConfigLoader::with_search_paths(paths.clone())
        .load_with(LoadOptions::default())
        .unwrap();
    assert_eq!(config, Config::default());

    let err = ConfigLoader::with_search_paths(paths)
        .load_with(LoadOptions {
            create_default: false,
            validate: true,
        })
        .unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound));
}

#[test]
fn test_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "[transport]\nport = 0\n").unwrap();

    let mut loader = ConfigLoader::with_search_paths(vec![dir.path().join("config")]);
    let err = loader.load_with(LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::ConfigValidationFailed { .. }));
}

#[test]
fn test_alias_with_whitespace_rejected_at_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[topics]\nprefix_alias = \" event\"\n",
    )
    .unwrap();

    let mut loader = ConfigLoader::with_search_paths(vec![dir.path().join("config")]);
    let err = loader.load_with(LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::ConfigValidationFailed { ref field, .. } if field == "topics.prefix_alias"));
}

#[test]
fn test_added_search_path_is_consulted() {
    let empty = TempDir::new().unwrap();
    let extra = TempDir::new().unwrap();
    fs::write(extra.path().join("relay.toml"), "[transport]\nport = 9300\n").unwrap();

    let mut loader = ConfigLoader::with_search_paths(vec![empty.path().join("config")]);
    loader.add_search_path(extra.path().join("relay"));
    assert_eq!(
        loader.search_paths(),
        &[empty.path().join("config"), extra.path().join("relay")]
    );

    let config = loader.load_with(LoadOptions::default()).unwrap();
    assert_eq!(config.transport.port, 9300);
    assert_eq!(loader.current_path(), Some(extra.path().join("relay.toml").as_path()));
}

#[test]
fn test_unparseable_file_reports_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[transport\nport = ").unwrap();

    let err = ConfigLoader::with_search_paths(Vec::new())
        .load_from_path(&path)
        .unwrap_err();
    assert!(matches!(err, Error::ConfigParseFailed { ref format, .. } if format == "TOML"));
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("sage-relay.toml");

    let mut config = Config::default();
    config.transport.port = 9200;
    config.ui.clamp_negative_height = false;

    let mut loader = ConfigLoader::with_search_paths(Vec::new());
    loader.save_to_path(&config, &path).unwrap();
    let reloaded = loader.load_from_path(&path).unwrap();
    assert_eq!(reloaded, config);
}
