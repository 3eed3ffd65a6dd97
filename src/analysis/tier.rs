//! Backend tiers and the degradation chain.
//!
//! ```text
//! Fast ─┐
//!       ├─> General ─> Safe
//! Deep ─┘
//! ```
//!
//! Only quota and availability errors move down the chain. Safe is the last
//! resort and has no successor.

use serde::{Deserialize, Serialize};

use super::error::ErrorKind;

/// Requested answer quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Low latency (loop modes)
    #[default]
    Fast,
    /// Deep reasoning (chat)
    Deep,
}

/// One candidate model in the degradation chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTier {
    Fast,
    Deep,
    General,
    Safe,
}

impl BackendTier {
    /// First tier tried for a quality tier
    pub fn initial(quality: QualityTier) -> Self {
        match quality {
            QualityTier::Fast => BackendTier::Fast,
            QualityTier::Deep => BackendTier::Deep,
        }
    }

    /// Successor in the chain, regardless of error
    pub fn successor(&self) -> Option<BackendTier> {
        match self {
            BackendTier::Fast | BackendTier::Deep => Some(BackendTier::General),
            BackendTier::General => Some(BackendTier::Safe),
            BackendTier::Safe => None,
        }
    }

    pub fn is_last_resort(&self) -> bool {
        self.successor().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendTier::Fast => "fast",
            BackendTier::Deep => "deep",
            BackendTier::General => "general",
            BackendTier::Safe => "safe",
        }
    }
}

impl std::fmt::Display for BackendTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tier to switch to after `kind` failed on `current`.
///
/// `None` means the chain has nothing to offer for this error and the
/// failure counts against the retry budget.
pub fn next_tier(current: BackendTier, kind: ErrorKind) -> Option<BackendTier> {
    if kind.triggers_fallback() {
        current.successor()
    } else {
        None
    }
}

/// Model identifiers per tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTable {
    #[serde(default = "default_fast_model")]
    pub fast: String,
    #[serde(default = "default_deep_model")]
    pub deep: String,
    #[serde(default = "default_general_model")]
    pub general: String,
    #[serde(default = "default_safe_model")]
    pub safe: String,
}

fn default_fast_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_deep_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_general_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_safe_model() -> String {
    "gemini-flash-latest".to_string()
}

impl Default for ModelTable {
    fn default() -> Self {
        Self {
            fast: default_fast_model(),
            deep: default_deep_model(),
            general: default_general_model(),
            safe: default_safe_model(),
        }
    }
}

impl ModelTable {
    pub fn model(&self, tier: BackendTier) -> &str {
        match tier {
            BackendTier::Fast => &self.fast,
            BackendTier::Deep => &self.deep,
            BackendTier::General => &self.general,
            BackendTier::Safe => &self.safe,
        }
    }
}
