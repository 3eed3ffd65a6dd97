//! Backend errors and their classification

use super::tier::BackendTier;

/// Error reported by a single backend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// HTTP status, if the request reached the service
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Connection-level failure (DNS, TLS, timeout, ...)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    fn is_quota(&self) -> bool {
        let lower = self.message.to_lowercase();
        self.status == Some(429)
            || lower.contains("quota")
            || lower.contains("429")
            || lower.contains("resource exhausted")
    }

    fn is_not_found(&self) -> bool {
        let lower = self.message.to_lowercase();
        self.status == Some(404) || lower.contains("not found") || lower.contains("404")
    }

    fn is_auth(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
            || self.message.to_lowercase().contains("api key")
    }

    /// Routing class used by the retry loop
    pub fn kind(&self) -> ErrorKind {
        if self.is_quota() {
            ErrorKind::QuotaExceeded
        } else if self.is_not_found() {
            ErrorKind::BackendUnavailable
        } else {
            ErrorKind::Other
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// How the retry loop reacts to a backend error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    QuotaExceeded,
    BackendUnavailable,
    Other,
}

impl ErrorKind {
    /// Whether the error moves the request down the tier chain
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, ErrorKind::QuotaExceeded | ErrorKind::BackendUnavailable)
    }
}

/// User-facing failure category once retries are exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Missing or rejected credentials
    Config,
    Quota,
    Unavailable,
    /// Anything else, reported as a connectivity problem
    Network,
}

impl FailureKind {
    /// Categorize the last error. Credential problems take precedence.
    pub fn of(error: &BackendError) -> Self {
        if error.is_auth() {
            FailureKind::Config
        } else if error.is_quota() {
            FailureKind::Quota
        } else if error.is_not_found() {
            FailureKind::Unavailable
        } else {
            FailureKind::Network
        }
    }

    /// Fixed speakable text for the category
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Config => "Configuration Error: Invalid API Key.",
            FailureKind::Quota => "Usage limit reached. Please try again in a moment.",
            FailureKind::Unavailable => "Model unavailable. Please try again later.",
            FailureKind::Network => {
                "Sorry, I am having trouble connecting to the network right now."
            }
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Config => write!(f, "configuration error"),
            FailureKind::Quota => write!(f, "quota exceeded"),
            FailureKind::Unavailable => write!(f, "model unavailable"),
            FailureKind::Network => write!(f, "connectivity failure"),
        }
    }
}

/// Error returned by the frame analysis client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Image payload is empty")]
    EmptyImage,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("{kind} after {attempts} attempts (last tier: {tier}): {last_error}")]
    Exhausted {
        kind: FailureKind,
        attempts: u32,
        tier: BackendTier,
        last_error: BackendError,
    },
}

impl AnalysisError {
    /// Degraded-mode text to speak in place of a result.
    ///
    /// `None` for malformed requests, which are faults of the caller.
    pub fn spoken_text(&self) -> Option<&'static str> {
        match self {
            AnalysisError::Exhausted { kind, .. } => Some(kind.user_message()),
            AnalysisError::EmptyImage | AnalysisError::EmptyPrompt => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AnalysisError::Exhausted { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
