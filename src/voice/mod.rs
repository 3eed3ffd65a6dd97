//! Voice control.
//!
//! Transcripts from a recognizer are classified by [`parse`] into
//! [`VoiceCommand`]s. The [`VoiceListener`] keeps the recognizer running
//! while voice control is enabled and forwards what it hears.

mod command;
mod listener;
mod parser;


pub use command::{ControlCommand, HELP_SUMMARY, VoiceCommand};
pub use listener::{ChannelTranscripts, Recognition, TranscriptSource, VoiceListener};
pub use parser::{CHAT_MIN_CHARS, parse};
