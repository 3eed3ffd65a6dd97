//! Transcript classification

use once_cell::sync::Lazy;
use regex::Regex;

use super::command::{ControlCommand, VoiceCommand};

/// Chat fallback needs more than this many characters
pub const CHAT_MIN_CHARS: usize = 2;

static ASK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ask|question|vision(?:\s+ai)?)\s+(?:vision\s+ai\s+)?(.+)")
        .expect("ask pattern is valid")
});

static TRIGGERS: Lazy<Vec<(ControlCommand, Vec<Regex>)>> = Lazy::new(|| {
    ControlCommand::ALL
        .iter()
        .map(|command| {
            let patterns = command
                .triggers()
                .iter()
                .map(|trigger| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(trigger)))
                        .expect("trigger pattern is valid")
                })
                .collect();
            (*command, patterns)
        })
        .collect()
});

/// Classify a transcript.
///
/// In order: an ask prefix captures the rest as a question; otherwise the
/// first control command with a matching trigger wins; otherwise, in chat
/// mode, anything longer than [`CHAT_MIN_CHARS`] becomes chat input.
pub fn parse(transcript: &str, chat_mode: bool) -> Option<VoiceCommand> {
    let transcript = transcript.trim().to_lowercase();

    if let Some(question) = ASK_PATTERN
        .captures(&transcript)
        .and_then(|caps| caps.get(1))
    {
        return Some(VoiceCommand::Ask(question.as_str().to_string()));
    }

    let matched = TRIGGERS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| pattern.is_match(&transcript)))
        .map(|(command, _)| *command);
    if let Some(command) = matched {
        return Some(VoiceCommand::Control(command));
    }

    if chat_mode && transcript.chars().count() > CHAT_MIN_CHARS {
        return Some(VoiceCommand::Chat(transcript));
    }

    None
}
