use std::time::Duration;

use super::*;

#[test]
fn test_default_config_template_matches_defaults() {
    let parsed: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
    assert_eq!(parsed, Config::default());
}

#[test]
fn test_empty_file_uses_defaults() {
    let parsed: Config = toml::from_str("").unwrap();
    assert_eq!(parsed.settings, Settings::default());
    assert_eq!(parsed.analysis.retries, 3);
    assert_eq!(parsed.analysis.models.safe, "gemini-flash-latest");
    assert_eq!(parsed.session.navigate_delay(), Duration::from_millis(1500));
    assert_eq!(parsed.speech.engine, EngineChoice::Auto);
    assert!(parsed.capture.frame_path().is_none());
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let parsed: Config = toml::from_str(
        r#"
[settings]
voice_enabled = true

[analysis.models]
fast = "custom-flash"

[speech]
engine = "log"
"#,
    )
    .unwrap();

    assert!(parsed.settings.voice_enabled);
    assert!(parsed.settings.haptics_enabled);
    assert_eq!(parsed.settings.speech_rate, 1.0);
    assert_eq!(parsed.analysis.models.fast, "custom-flash");
    assert_eq!(parsed.analysis.models.deep, "gemini-3-pro-preview");
    assert_eq!(parsed.speech.engine, EngineChoice::Log);
}

#[test]
fn test_speech_rate_is_clamped() {
    assert_eq!(Settings::default().with_speech_rate(5.0).speech_rate, 2.0);
    assert_eq!(Settings::default().with_speech_rate(0.1).speech_rate, 0.5);
    assert_eq!(Settings::default().with_speech_rate(1.25).speech_rate, 1.25);
    assert_eq!(Settings::default().with_speech_rate(f32::NAN).speech_rate, 1.0);
}

#[test]
fn test_from_file_normalizes_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[settings]\nspeech_rate = 9.0\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.settings.speech_rate, 2.0);
}

#[test]
fn test_retry_policy_has_at_least_one_attempt() {
    let analysis = AnalysisConfig {
        retries: 0,
        backoff_ms: 250,
        ..AnalysisConfig::default()
    };
    let policy = analysis.retry_policy();
    assert_eq!(policy.retries, 1);
    assert_eq!(policy.backoff, Duration::from_millis(250));
}

#[test]
fn test_literal_key_is_fallback() {
    let analysis = AnalysisConfig {
        api_key_env: "VISIONAI_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        api_key: "literal".to_string(),
        ..AnalysisConfig::default()
    };
    assert_eq!(analysis.key_source().resolve().as_deref(), Some("literal"));
}

#[test]
fn test_write_default_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    Config::write_default(&path, false).unwrap();
    assert!(Config::write_default(&path, false).is_err());
    Config::write_default(&path, true).unwrap();

    assert_eq!(Config::from_file(&path).unwrap(), Config::default());
}

#[test]
fn test_store_saves_every_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut store = SettingsStore::open(&path).unwrap();
    assert_eq!(store.settings(), Settings::default());
    assert!(!path.exists());

    store.update(|settings| settings.voice_enabled = true).unwrap();
    assert!(Config::from_file(&path).unwrap().settings.voice_enabled);

    let saved = store.update(|settings| settings.speech_rate = 3.0).unwrap();
    assert_eq!(saved.speech_rate, 2.0);

    let reopened = SettingsStore::open(&path).unwrap();
    assert_eq!(reopened.settings(), saved);
}
