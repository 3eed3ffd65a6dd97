//! Settings persistence round trips through the config file

use visionai::config::{Config, SettingsStore};

#[test]
fn test_missing_file_loads_documented_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::open(dir.path().join("config.toml")).unwrap();

    let settings = store.settings();
    assert_eq!(settings.speech_rate, 1.0);
    assert!(!settings.voice_enabled);
    assert!(settings.haptics_enabled);
}

#[test]
fn test_changes_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut store = SettingsStore::open(&path).unwrap();
    store
        .update(|settings| {
            settings.speech_rate = 1.5;
            settings.haptics_enabled = false;
        })
        .unwrap();

    let reloaded = SettingsStore::open(&path).unwrap().settings();
    assert_eq!(reloaded.speech_rate, 1.5);
    assert!(!reloaded.haptics_enabled);
    assert!(!reloaded.voice_enabled);
}

#[test]
fn test_settings_update_keeps_other_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[analysis]\nretries = 5\n\n[capture]\nframe_path = \"/tmp/frame.jpg\"\n",
    )
    .unwrap();

    let mut store = SettingsStore::open(&path).unwrap();
    store.update(|settings| settings.voice_enabled = true).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert!(config.settings.voice_enabled);
    assert_eq!(config.analysis.retries, 5);
    assert_eq!(config.capture.frame_path.as_str(), "/tmp/frame.jpg");
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[settings\nspeech_rate = ").unwrap();

    let err = SettingsStore::open(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}
