//! Navigation hazard policy.
//!
//! Classifies a Navigate-mode result by keyword. Levels are checked in
//! priority order and the first match wins, so a "stop" result that also
//! mentions something "close" is always a [`HazardLevel::Danger`].

use super::audio_cue::{AudioCue, PAN_LEFT, PAN_RIGHT};
use super::haptic::HapticPattern;

/// Severity detected in a navigation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HazardLevel {
    /// "caution" or "warning"
    Caution,
    /// "close"
    Close,
    /// "very close"
    VeryClose,
    /// "stop" or "danger"
    Danger,
}

/// Side an obstacle is reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    /// Neither side, or both sides mentioned
    Center,
}

impl Direction {
    /// Stereo pan for spatial audio cues
    pub fn pan(&self) -> f32 {
        match self {
            Direction::Left => PAN_LEFT,
            Direction::Right => PAN_RIGHT,
            Direction::Center => 0.0,
        }
    }
}

/// The cues to play alongside a navigation result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationCue {
    pub level: HazardLevel,
    pub direction: Direction,
    /// Spatial audio cue, only for the two most severe levels
    pub audio: Option<AudioCue>,
    pub haptic: HapticPattern,
}

/// Detect the reported direction. A side only counts when the other one is
/// not mentioned at all.
pub fn detect_direction(text: &str) -> Direction {
    let upper = text.to_uppercase();
    let left = upper.contains("LEFT");
    let right = upper.contains("RIGHT");
    match (left, right) {
        (true, false) => Direction::Left,
        (false, true) => Direction::Right,
        _ => Direction::Center,
    }
}

/// Detect the most urgent hazard level mentioned in the text
pub fn detect_level(text: &str) -> Option<HazardLevel> {
    let upper = text.to_uppercase();
    if upper.contains("STOP") || upper.contains("DANGER") {
        Some(HazardLevel::Danger)
    } else if upper.contains("VERY CLOSE") {
        Some(HazardLevel::VeryClose)
    } else if upper.contains("CLOSE") {
        Some(HazardLevel::Close)
    } else if upper.contains("CAUTION") || upper.contains("WARNING") {
        Some(HazardLevel::Caution)
    } else {
        None
    }
}

/// Classify a navigation result into the cues to play, if any
pub fn classify_navigation(text: &str) -> Option<NavigationCue> {
    let level = detect_level(text)?;
    let direction = detect_direction(text);
    let pan = direction.pan();

    let (audio, haptic) = match level {
        HazardLevel::Danger => (Some(AudioCue::Hazard { pan }), HapticPattern::HAZARD),
        HazardLevel::VeryClose => (Some(AudioCue::Ping { pan }), HapticPattern::VERY_CLOSE),
        HazardLevel::Close => (None, HapticPattern::CLOSE),
        HazardLevel::Caution => (None, HapticPattern::WARNING),
    };

    Some(NavigationCue {
        level,
        direction,
        audio,
        haptic,
    })
}
