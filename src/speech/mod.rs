//! Speech output.
//!
//! - [`SpeechEngine`]: a text-to-speech backend (external command or console)
//! - [`Speaker`]: owns the engine and guarantees a single audible utterance
//!
//! Every utterance started through the [`Speaker`] resolves exactly once to a
//! [`SpeechEnd`], even when the engine fails.

mod engines;
mod speaker;

#[cfg(test)]
mod tests;

use anyhow::Result;
use async_trait::async_trait;

pub use engines::{CommandSpeech, ConsoleSpeech, detect_engine};
pub use speaker::{SpeechEnd, Speaker, Utterance};

/// A text-to-speech backend
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak `text` at `rate` (1.0 = normal) and resolve when it has been read out
    async fn speak(&self, text: &str, rate: f32) -> Result<()>;

    /// Silence whatever is currently being spoken
    fn stop(&self);

    /// Engine name for logs
    fn name(&self) -> &str;
}
