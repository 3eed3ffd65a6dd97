//! Vibration patterns

/// A vibration pattern: alternating on/off durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HapticPattern {
    pub name: &'static str,
    pub pulses_ms: &'static [u64],
}

impl HapticPattern {
    pub const CLICK: HapticPattern = HapticPattern::new("click", &[10]);
    pub const SUCCESS: HapticPattern = HapticPattern::new("success", &[50, 50, 50]);
    pub const ERROR: HapticPattern = HapticPattern::new("error", &[50, 100, 50, 100]);
    pub const HAZARD: HapticPattern = HapticPattern::new("hazard", &[300, 100, 300, 100, 300]);
    pub const WARNING: HapticPattern = HapticPattern::new("warning", &[200, 100]);
    pub const VERY_CLOSE: HapticPattern = HapticPattern::new("very_close", &[400, 50, 400]);
    pub const CLOSE: HapticPattern = HapticPattern::new("close", &[200, 200]);

    pub const fn new(name: &'static str, pulses_ms: &'static [u64]) -> Self {
        Self { name, pulses_ms }
    }

    /// Total play time of the pattern
    pub fn total_ms(&self) -> u64 {
        self.pulses_ms.iter().sum()
    }
}

impl std::fmt::Display for HapticPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
