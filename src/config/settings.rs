//! Persisted user settings

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed speech rates
pub const SPEECH_RATE_RANGE: RangeInclusive<f32> = 0.5..=2.0;

/// User-facing settings, written back on every change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Speech rate multiplier (1.0 = normal)
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    /// Listen for spoken commands
    #[serde(default)]
    pub voice_enabled: bool,

    /// Vibrate on mode switches, results and hazards
    #[serde(default = "default_haptics_enabled")]
    pub haptics_enabled: bool,
}

fn default_speech_rate() -> f32 {
    1.0
}

fn default_haptics_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speech_rate: default_speech_rate(),
            voice_enabled: false,
            haptics_enabled: default_haptics_enabled(),
        }
    }
}

impl Settings {
    /// Copy with the speech rate forced into [`SPEECH_RATE_RANGE`]
    pub fn normalized(mut self) -> Self {
        self.speech_rate = clamp_speech_rate(self.speech_rate);
        self
    }

    pub fn with_speech_rate(mut self, rate: f32) -> Self {
        self.speech_rate = clamp_speech_rate(rate);
        self
    }
}

fn clamp_speech_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return default_speech_rate();
    }
    rate.clamp(*SPEECH_RATE_RANGE.start(), *SPEECH_RATE_RANGE.end())
}
