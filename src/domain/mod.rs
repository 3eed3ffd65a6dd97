//! Domain types: modes, chat, cues and the navigation hazard policy

pub mod audio_cue;
pub mod chat;
pub mod haptic;
pub mod hazard;
pub mod mode;
pub mod shortcut;


pub use audio_cue::{AudioCue, PAN_LEFT, PAN_RIGHT, Tone, Waveform};
pub use chat::{ChatHistory, ChatMessage, ChatRole};
pub use haptic::HapticPattern;
pub use hazard::{Direction, HazardLevel, NavigationCue, classify_navigation};
pub use mode::{AppMode, SYSTEM_INSTRUCTION};
pub use shortcut::Shortcut;
