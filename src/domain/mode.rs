//! Operating modes and the static mode registry.
//!
//! Every mode maps to a prompt template, a display label, a color tag and the
//! haptic pattern played when it is selected. Only [`AppMode::Navigate`] keeps
//! the capture loop running after a result has been spoken.

use serde::{Deserialize, Serialize};

use super::haptic::HapticPattern;
use crate::analysis::QualityTier;

/// Fixed system instruction sent with every analysis request
pub const SYSTEM_INSTRUCTION: &str = "You are VisionAI, a helpful and friendly guide for a visually impaired user. Speak naturally, clearly, and with a warm tone. When describing scenes, be descriptive but not overly wordy. For navigation, prioritize safety hazards and clear directions. Do not use markdown formatting.";

/// The operating mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Describe the overall scene
    #[default]
    Scene,
    /// Read visible text aloud
    Read,
    /// Identify the main object
    Object,
    /// Continuous hazard narration
    Navigate,
    /// Describe dominant colors
    Color,
    /// Free-form questions about the current frame
    Chat,
}

impl AppMode {
    /// All modes in display (and keyboard shortcut) order
    pub const ALL: [AppMode; 6] = [
        AppMode::Scene,
        AppMode::Read,
        AppMode::Object,
        AppMode::Navigate,
        AppMode::Color,
        AppMode::Chat,
    ];

    /// Stable identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Scene => "scene",
            AppMode::Read => "read",
            AppMode::Object => "object",
            AppMode::Navigate => "navigate",
            AppMode::Color => "color",
            AppMode::Chat => "chat",
        }
    }

    /// Human-readable label, also spoken when the mode is selected
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Scene => "Scene",
            AppMode::Read => "Read",
            AppMode::Object => "Object",
            AppMode::Navigate => "Navigate",
            AppMode::Color => "Color",
            AppMode::Chat => "Chat",
        }
    }

    /// Prompt template for the mode.
    ///
    /// Chat has no static prompt: the question is supplied per submission and
    /// wrapped by [`super::chat::ChatHistory::build_prompt`].
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            AppMode::Scene => Some(
                "Describe this scene naturally. Mention the overall vibe, the people (if any), and the main objects around.",
            ),
            AppMode::Read => Some(
                "Read the text in this image. Read it exactly as it appears. If it's a menu, read the items and prices. If there is no text, just say 'I don't see any text here'.",
            ),
            AppMode::Object => Some(
                "What is the main object here? Describe what it looks like, its color, material, and condition in a natural way.",
            ),
            AppMode::Navigate => Some(
                "Navigation Mode. Scan for hazards. \n1. Start with 'Stop', 'Caution', or 'Safe'.\n2. Mention obstacles and their distance (Very Close, Close, Far).\n3. Specify direction (Left, Right, Ahead).\n4. Warn about floor hazards like steps or cords.",
            ),
            AppMode::Color => Some(
                "What are the main colors you see? Describe the object's color and the background.",
            ),
            AppMode::Chat => None,
        }
    }

    /// Color tag (hex) used by front-ends
    pub fn color(&self) -> &'static str {
        match self {
            AppMode::Scene => "#3B82F6",
            AppMode::Read => "#10B981",
            AppMode::Object => "#8B5CF6",
            AppMode::Navigate => "#EF4444",
            AppMode::Color => "#EC4899",
            AppMode::Chat => "#F59E0B",
        }
    }

    /// Haptic pattern played when the mode is selected
    pub fn haptic(&self) -> HapticPattern {
        HapticPattern::CLICK
    }

    /// Whether the capture loop re-triggers itself after each spoken result
    pub fn is_continuous(&self) -> bool {
        matches!(self, AppMode::Navigate)
    }

    /// Chat bypasses the capture loop and uses direct submission
    pub fn uses_loop(&self) -> bool {
        !matches!(self, AppMode::Chat)
    }

    /// Quality tier requested from the analysis client
    pub fn quality_tier(&self) -> QualityTier {
        match self {
            AppMode::Chat => QualityTier::Deep,
            _ => QualityTier::Fast,
        }
    }

    /// Mode bound to a numeric shortcut key (`1`..=`6`)
    pub fn from_shortcut(digit: u8) -> Option<AppMode> {
        let index = usize::from(digit).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scene" => Ok(AppMode::Scene),
            "read" => Ok(AppMode::Read),
            "object" => Ok(AppMode::Object),
            "navigate" | "nav" => Ok(AppMode::Navigate),
            "color" | "colour" => Ok(AppMode::Color),
            "chat" => Ok(AppMode::Chat),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}
