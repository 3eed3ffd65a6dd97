//! Frame analysis: one multimodal inference per call, with model fallback.
//!
//! The [`AnalysisClient`] walks the backend tier chain on quota and
//! availability errors and retries other failures with linear backoff.
//! Exhaustion is reported as a structured [`AnalysisError`]; callers format
//! it to speakable text with [`AnalysisError::spoken_text`].

mod client;
mod error;
pub mod gemini;
mod tier;


use async_trait::async_trait;

use crate::capture::Frame;

pub use client::{AnalysisClient, EMPTY_RESULT_TEXT, RetryPolicy};
pub use error::{AnalysisError, BackendError, ErrorKind, FailureKind};
pub use gemini::{ApiKeySource, DEFAULT_ENDPOINT, GeminiBackend, GeminiOptions};
pub use tier::{BackendTier, ModelTable, QualityTier, next_tier};

/// One analysis invocation. Built per call and consumed once.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: Frame,
    pub prompt: String,
    pub quality: QualityTier,
}

impl AnalysisRequest {
    pub fn new(image: Frame, prompt: impl Into<String>, quality: QualityTier) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            quality,
        }
    }
}

/// A remote multimodal model service
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Issue one request against `model`.
    ///
    /// `Ok(None)` means the service answered without any text.
    async fn generate(
        &self,
        model: &str,
        request: &AnalysisRequest,
    ) -> Result<Option<String>, BackendError>;
}

/// Anything that turns a frame and a prompt into text
#[async_trait]
pub trait FrameAnalyzer: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<String, AnalysisError>;
}
