//! Concrete speech engines

use std::process::{Command as StdCommand, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SpeechEngine;
use crate::config::{EngineChoice, SpeechConfig};

/// Words per minute at rate 1.0
const BASE_WPM: f32 = 175.0;

/// Words per second the console engine assumes at rate 1.0
const CONSOLE_WORDS_PER_SEC: f32 = 2.5;

/// Speaks through an external TTS program (`say`, `espeak-ng`, `espeak`)
pub struct CommandSpeech {
    program: String,
    current: Mutex<Option<CancellationToken>>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(None),
        }
    }

    /// First TTS program found on PATH
    pub fn discover() -> Option<Self> {
        ["say", "espeak-ng", "espeak"]
            .into_iter()
            .find(|program| is_installed(program))
            .map(Self::new)
    }

    pub(super) fn args(&self, text: &str, rate: f32) -> Vec<String> {
        let wpm = (BASE_WPM * rate).round() as u32;
        let rate_flag = if self.program.ends_with("say") { "-r" } else { "-s" };
        vec![rate_flag.to_string(), wpm.to_string(), text.to_string()]
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeech {
    async fn speak(&self, text: &str, rate: f32) -> Result<()> {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
        }

        let mut child = Command::new(&self.program)
            .args(self.args(text, rate))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        tokio::select! {
            status = child.wait() => {
                let status = status.with_context(|| format!("{} did not run", self.program))?;
                if !status.success() {
                    bail!("{} exited with {}", self.program, status);
                }
            }
            _ = token.cancelled() => {
                let _ = child.kill().await;
                debug!("{} interrupted", self.program);
            }
        }
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(token) = current.take() {
                token.cancel();
            }
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Prints utterances to stdout and waits roughly as long as reading them aloud would take
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl ConsoleSpeech {
    fn reading_time(text: &str, rate: f32) -> Duration {
        let words = text.split_whitespace().count().max(1) as f32;
        Duration::from_secs_f32(words / (CONSOLE_WORDS_PER_SEC * rate.max(0.1)))
    }
}

#[async_trait]
impl SpeechEngine for ConsoleSpeech {
    async fn speak(&self, text: &str, rate: f32) -> Result<()> {
        println!("🔊 {}", text);
        tokio::time::sleep(Self::reading_time(text, rate)).await;
        Ok(())
    }

    fn stop(&self) {}

    fn name(&self) -> &str {
        "console"
    }
}

fn is_installed(program: &str) -> bool {
    StdCommand::new("which")
        .arg(program)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Pick the engine described by the `[speech]` config section
pub fn detect_engine(config: &SpeechConfig) -> Result<Arc<dyn SpeechEngine>> {
    let engine: Arc<dyn SpeechEngine> = match config.engine {
        EngineChoice::Log => Arc::new(ConsoleSpeech),
        EngineChoice::Command => {
            if config.command.trim().is_empty() {
                bail!("speech.engine is \"command\" but speech.command is empty");
            }
            Arc::new(CommandSpeech::new(config.command.trim()))
        }
        EngineChoice::Auto => {
            if !config.command.trim().is_empty() {
                Arc::new(CommandSpeech::new(config.command.trim()))
            } else if let Some(engine) = CommandSpeech::discover() {
                Arc::new(engine)
            } else {
                Arc::new(ConsoleSpeech)
            }
        }
    };
    info!("Speech engine: {}", engine.name());
    Ok(engine)
}
