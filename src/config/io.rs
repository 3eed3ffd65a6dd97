//! Configuration file I/O operations

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;

use super::Config;

/// Commented default configuration written by `visionai init`
pub const DEFAULT_CONFIG_TOML: &str = r#"# VisionAI configuration

[settings]
# Speech rate multiplier, 0.5 to 2.0
speech_rate = 1.0
# Listen for spoken commands
voice_enabled = false
haptics_enabled = true

[analysis]
# The API key is read from this environment variable on every request
api_key_env = "GEMINI_API_KEY"
# Literal key used when the variable is unset
api_key = ""
endpoint = "https://generativelanguage.googleapis.com/v1beta"
# Counted attempts per analysis; switching models after quota or
# availability errors does not count
retries = 3
# Wait attempt x backoff_ms between counted attempts
backoff_ms = 1000
temperature = 0.7
# Thinking budget for gemini-3 models
thinking_budget = 16384
# Output cap for the other models
max_output_tokens = 1024
timeout_secs = 30

[analysis.models]
fast = "gemini-3-flash-preview"
deep = "gemini-3-pro-preview"
general = "gemini-2.0-flash"
safe = "gemini-flash-latest"

[session]
# Pause between navigation narrations
navigate_delay_ms = 1500
# Completion delay after a speech engine error
speech_grace_ms = 500

[speech]
# auto | command | log
engine = "auto"
# e.g. "espeak-ng"; auto tries say, espeak-ng, espeak
command = ""

[capture]
# Image file refreshed by an external camera tool
frame_path = ""
"#;

impl Config {
    /// Get the global config directory path (~/.visionai/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".visionai")
    }

    /// Get the global config file path (~/.visionai/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.settings = config.settings.normalized();

        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a file with atomic write and file locking.
    ///
    /// 1. Exclusive lock prevents concurrent writes from two sessions
    /// 2. Atomic write (temp file + rename) prevents corruption on crash
    /// 3. Parent directory is created if needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        write_locked(path, &content)
    }

    /// Write the commented default config to `path`
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        write_locked(path, DEFAULT_CONFIG_TOML)
    }
}

fn write_locked(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    // Lock file is separate from the config so the rename cannot break it
    let lock_path = path.with_extension("toml.lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    lock_file
        .lock_exclusive()
        .with_context(|| "Failed to acquire config lock")?;

    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write config content")?;

    temp_file
        .sync_all()
        .with_context(|| "Failed to sync config file")?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename config file: {}", path.display()))?;

    // Lock is released when lock_file is dropped
    Ok(())
}
