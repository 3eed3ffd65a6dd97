use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::{Config, Settings};

/// Settings backed by the config file.
///
/// Loaded once at startup; every change is written back immediately.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    config: Config,
}

impl SettingsStore {
    /// Open the store at `path`. A missing file means defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Config::load_or_default(&path)?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> Settings {
        self.config.settings
    }

    /// Apply `change`, normalize, and persist. Returns the stored settings.
    pub fn update<F>(&mut self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.config.settings;
        change(&mut settings);
        self.replace(settings)
    }

    /// Store `settings` as a whole
    pub fn replace(&mut self, settings: Settings) -> Result<Settings> {
        let settings = settings.normalized();
        self.config.settings = settings;
        self.config.save_to_file(&self.path)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(settings)
    }
}
