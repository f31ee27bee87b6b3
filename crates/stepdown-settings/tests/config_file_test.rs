use stepdown_camtools::Alignment;
use stepdown_settings::{Config, SettingsError};
use tempfile::TempDir;

#[test]
fn test_toml_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::new();
    config.passes.increment = -2.0;
    config.passes.feed_override = Some(450);
    config.output.pretty = true;
    config.output.alignment = Alignment::Corner;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "passes": { "skip_height": 3.0 }, "output": { "annotate_skips": true } }"#,
    )
    .unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.passes.skip_height, 3.0);
    assert_eq!(loaded.passes.increment, -3.0);
    assert!(loaded.output_style().annotate_skips);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, "passes: {}").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "yaml"));
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[passes]\nincrement = 1.0\n").unwrap();
    assert!(matches!(Config::load_from_file(&path), Err(SettingsError::Invalid(_))));

    std::fs::write(&path, "[output]\nalignment = \"left\"\n").unwrap();
    assert!(matches!(Config::load_from_file(&path), Err(SettingsError::TomlError(_))));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError { .. }));
}
