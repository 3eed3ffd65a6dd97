//! Audio and haptic feedback sinks

use std::sync::Mutex;

use tracing::{debug, info};

use crate::domain::{AudioCue, HapticPattern};

/// Plays short earcons and vibration patterns
pub trait CueSink: Send + Sync {
    fn play(&self, cue: AudioCue);
    fn vibrate(&self, pattern: HapticPattern);
}

/// Renders cues as log lines
#[derive(Debug, Default)]
pub struct LogCues;

impl CueSink for LogCues {
    fn play(&self, cue: AudioCue) {
        let tones: Vec<String> = cue
            .tones()
            .iter()
            .map(|tone| format!("{:.0}Hz@{:.2}s", tone.frequency_hz, tone.start_secs))
            .collect();
        info!(cue = cue.name(), pan = cue.pan(), "♪ {}", tones.join(" "));
    }

    fn vibrate(&self, pattern: HapticPattern) {
        debug!(pattern = pattern.name, "Vibrate {:?}", pattern.pulses_ms);
    }
}

/// A played cue or vibration, as captured by [`RecordingCues`]
#[derive(Debug, Clone, PartialEq)]
pub enum CueEvent {
    Sound(AudioCue),
    Haptic(HapticPattern),
}

/// Collects cues in order. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingCues {
    events: Mutex<Vec<CueEvent>>,
}

impl RecordingCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CueEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn sounds(&self) -> Vec<AudioCue> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CueEvent::Sound(cue) => Some(cue),
                CueEvent::Haptic(_) => None,
            })
            .collect()
    }

    pub fn haptics(&self) -> Vec<HapticPattern> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                CueEvent::Haptic(pattern) => Some(pattern),
                CueEvent::Sound(_) => None,
            })
            .collect()
    }

    fn push(&self, event: CueEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CueSink for RecordingCues {
    fn play(&self, cue: AudioCue) {
        self.push(CueEvent::Sound(cue));
    }

    fn vibrate(&self, pattern: HapticPattern) {
        self.push(CueEvent::Haptic(pattern));
    }
}
