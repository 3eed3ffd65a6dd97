//! Messages into and out of a session

use crate::analysis::AnalysisError;
use crate::config::Settings;
use crate::domain::{AppMode, Shortcut};
use crate::speech::SpeechEnd;

/// External trigger for the session
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Start or stop the capture loop
    Toggle,
    /// Stop everything
    Escape,
    SelectMode(AppMode),
    /// Speak the last result again
    Repeat,
    Shortcut(Shortcut),
    /// Raw recognizer output, classified by the voice parser
    Transcript(String),
    /// Typed chat question (Chat mode)
    ChatSubmit(String),
    ClearChat,
    Connectivity { online: bool },
    UpdateSettings(Settings),
    Shutdown,
}

impl From<Shortcut> for Input {
    fn from(shortcut: Shortcut) -> Self {
        Input::Shortcut(shortcut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Where an analysis request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Origin {
    /// Mode prompt from the capture loop
    Loop,
    /// Chat question
    Chat,
}

/// What an analysis task settled to
#[derive(Debug)]
pub(super) enum Settled {
    Answer(String),
    /// Degraded text standing in for an exhausted backend
    Degraded(String),
    /// Not speakable; ends the session
    Failed(String),
}

impl Settled {
    pub(super) fn from_result(result: Result<String, AnalysisError>) -> Self {
        match result {
            Ok(text) => Settled::Answer(text),
            Err(err) => match err.spoken_text() {
                Some(text) => Settled::Degraded(text.to_string()),
                None => Settled::Failed(err.to_string()),
            },
        }
    }
}

/// Results of spawned work, tagged with the epoch that started it
#[derive(Debug)]
pub(super) enum Continuation {
    Analysis {
        epoch: u64,
        origin: Origin,
        settled: Settled,
    },
    Speech {
        epoch: u64,
        id: u64,
        end: SpeechEnd,
    },
    LoopTimer {
        epoch: u64,
    },
}
