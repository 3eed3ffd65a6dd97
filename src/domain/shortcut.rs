//! Keyboard shortcuts

use super::mode::AppMode;

/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Space: start/stop the capture loop (ignored in Chat)
    ToggleActive,
    /// Escape: stop everything
    Escape,
    /// `1`..=`6`: select a mode
    SelectMode(AppMode),
    /// `r`: speak the last result again
    Repeat,
}

impl Shortcut {
    /// Resolve a key name (`" "`, `"space"`, `"esc"`, `"1"`, `"r"`, ...)
    pub fn from_key(key: &str) -> Option<Shortcut> {
        if key == " " {
            return Some(Shortcut::ToggleActive);
        }
        match key.trim().to_lowercase().as_str() {
            "space" => Some(Shortcut::ToggleActive),
            "esc" | "escape" => Some(Shortcut::Escape),
            "r" => Some(Shortcut::Repeat),
            digit if digit.len() == 1 => digit
                .parse::<u8>()
                .ok()
                .and_then(AppMode::from_shortcut)
                .map(Shortcut::SelectMode),
            _ => None,
        }
    }
}
