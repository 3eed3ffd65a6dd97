//! VisionAI - an accessibility companion
//!
//! VisionAI captures camera frames, asks a multimodal model to describe them
//! for the current mode, and reads the answer aloud. Navigation mode keeps
//! narrating while active and adds spatial audio and vibration cues for
//! hazards. A chat mode answers free-form questions about what the camera
//! sees, typed or spoken.
//!
//! ## Layout
//!
//! - [`domain`]: modes, chat history, hazard policy, cue definitions
//! - [`analysis`]: the frame analysis client with model fallback
//! - [`orchestrator`]: the session state machine
//! - [`voice`], [`speech`], [`capture`], [`cue`]: collaborators at the edges

pub mod analysis;
pub mod capture;
pub mod config;
pub mod cue;
pub mod domain;
pub mod orchestrator;
pub mod speech;
pub mod voice;

pub use domain::*;
