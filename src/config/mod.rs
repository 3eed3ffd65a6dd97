//! Configuration loading and management

mod io;
mod settings;
mod store;

#[cfg(test)]
mod tests;

pub use io::DEFAULT_CONFIG_TOML;
pub use settings::{SPEECH_RATE_RANGE, Settings};
pub use store::SettingsStore;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::{
    AnalysisClient, ApiKeySource, DEFAULT_ENDPOINT, GeminiBackend, GeminiOptions, ModelTable,
    RetryPolicy,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Persisted user settings
    #[serde(default)]
    pub settings: Settings,

    /// Vision model access
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Session timing
    #[serde(default)]
    pub session: SessionConfig,

    /// Speech output engine
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Frame source
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// `[analysis]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Environment variable holding the API key, read on every request
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Literal API key, used when the environment variable is unset
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Counted attempts per analysis (tier switches are free)
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Linear backoff unit between counted attempts
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Thinking budget for gemini-3 models
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Output cap for the other models
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Model per backend tier
    #[serde(default)]
    pub models: ModelTable,
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_thinking_budget() -> u32 {
    16384
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            temperature: default_temperature(),
            thinking_budget: default_thinking_budget(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
            models: ModelTable::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn key_source(&self) -> ApiKeySource {
        ApiKeySource::from_env(&self.api_key_env).with_fallback(&self.api_key)
    }

    pub fn gemini_options(&self) -> GeminiOptions {
        GeminiOptions {
            endpoint: self.endpoint.clone(),
            temperature: self.temperature,
            thinking_budget: self.thinking_budget,
            max_output_tokens: self.max_output_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries.max(1),
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }

    /// Analysis client backed by the Gemini REST API
    pub fn client(&self) -> AnalysisClient {
        let backend = GeminiBackend::new(self.key_source(), self.gemini_options());
        AnalysisClient::new(Arc::new(backend))
            .with_models(self.models.clone())
            .with_policy(self.retry_policy())
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pause between continuous narration cycles
    #[serde(default = "default_navigate_delay_ms")]
    pub navigate_delay_ms: u64,

    /// How long a failed utterance waits before reporting completion
    #[serde(default = "default_speech_grace_ms")]
    pub speech_grace_ms: u64,
}

fn default_navigate_delay_ms() -> u64 {
    1500
}

fn default_speech_grace_ms() -> u64 {
    500
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            navigate_delay_ms: default_navigate_delay_ms(),
            speech_grace_ms: default_speech_grace_ms(),
        }
    }
}

impl SessionConfig {
    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_delay_ms)
    }

    pub fn speech_grace(&self) -> Duration {
        Duration::from_millis(self.speech_grace_ms)
    }
}

/// Which speech engine to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// Configured command, else the first of say/espeak-ng/espeak, else log
    #[default]
    Auto,
    /// Always the configured command
    Command,
    /// Print utterances instead of speaking them
    Log,
}

/// `[speech]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub engine: EngineChoice,

    /// TTS program, e.g. "espeak-ng"
    #[serde(default)]
    pub command: String,
}

/// `[capture]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Image file kept fresh by an external camera tool
    #[serde(default)]
    pub frame_path: String,
}

impl CaptureConfig {
    pub fn frame_path(&self) -> Option<PathBuf> {
        let path = self.frame_path.trim();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
