//! Short synthesized UI sounds.
//!
//! Cues are described as tone sequences so that any sink can render them
//! (or just log them) without bundling audio assets.

/// Stereo position for a hazard cue biased to the left
pub const PAN_LEFT: f32 = -0.8;
/// Stereo position for a hazard cue biased to the right
pub const PAN_RIGHT: f32 = 0.8;

/// Oscillator shape of a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One tone inside a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration_secs: f32,
    /// Offset from the start of the cue
    pub start_secs: f32,
    /// -1.0 (left) ..= 1.0 (right)
    pub pan: f32,
}

const fn tone(frequency_hz: f32, waveform: Waveform, duration_secs: f32, start_secs: f32, pan: f32) -> Tone {
    Tone {
        frequency_hz,
        waveform,
        duration_secs,
        start_secs,
        pan,
    }
}

/// Audio feedback events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    Click,
    ModeSwitch,
    /// A frame was captured for the loop
    Shutter,
    /// A result is ready
    Success,
    Error,
    /// Stop/danger in a navigation result
    Hazard { pan: f32 },
    /// Something very close in a navigation result
    Ping { pan: f32 },
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Click => "click",
            AudioCue::ModeSwitch => "mode_switch",
            AudioCue::Shutter => "shutter",
            AudioCue::Success => "success",
            AudioCue::Error => "error",
            AudioCue::Hazard { .. } => "hazard",
            AudioCue::Ping { .. } => "ping",
        }
    }

    /// Stereo position of the cue (0.0 for centered cues)
    pub fn pan(&self) -> f32 {
        match self {
            AudioCue::Hazard { pan } | AudioCue::Ping { pan } => *pan,
            _ => 0.0,
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match *self {
            AudioCue::Click => vec![tone(800.0, Sine, 0.1, 0.0, 0.0)],
            AudioCue::ModeSwitch => vec![
                tone(400.0, Sine, 0.1, 0.0, 0.0),
                tone(600.0, Sine, 0.1, 0.1, 0.0),
            ],
            AudioCue::Shutter => vec![
                tone(200.0, Square, 0.05, 0.0, 0.0),
                tone(150.0, Square, 0.05, 0.05, 0.0),
            ],
            AudioCue::Success => vec![
                tone(500.0, Sine, 0.1, 0.0, 0.0),
                tone(1000.0, Sine, 0.2, 0.1, 0.0),
            ],
            AudioCue::Error => vec![
                tone(200.0, Sawtooth, 0.2, 0.0, 0.0),
                tone(150.0, Sawtooth, 0.4, 0.2, 0.0),
            ],
            AudioCue::Hazard { pan } => vec![
                tone(150.0, Sawtooth, 0.1, 0.0, pan),
                tone(150.0, Sawtooth, 0.1, 0.15, pan),
                tone(150.0, Sawtooth, 0.1, 0.3, pan),
            ],
            AudioCue::Ping { pan } => vec![
                tone(880.0, Sine, 0.05, 0.0, pan),
                tone(880.0, Sine, 0.05, 0.1, pan),
            ],
        }
    }

    /// Length of the cue from its first tone start to its last tone end
    pub fn duration_secs(&self) -> f32 {
        self.tones()
            .iter()
            .map(|t| t.start_secs + t.duration_secs)
            .fold(0.0, f32::max)
    }
}

impl std::fmt::Display for AudioCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
