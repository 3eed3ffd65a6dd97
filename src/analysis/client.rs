//! Retry and fallback loop

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::{AnalysisError, FailureKind};
use super::tier::{BackendTier, ModelTable, next_tier};
use super::{AnalysisRequest, FrameAnalyzer, VisionBackend};

/// Returned when the backend answers with no text
pub const EMPTY_RESULT_TEXT: &str = "I could not analyze the image.";

/// Retry budget for failures that do not move down the tier chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Counted attempts (tier switches are free). At least 1.
    pub retries: u32,
    /// Wait before attempt `n + 1` is `n × backoff`
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_millis(1000),
        }
    }
}

/// Frame analysis client
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn VisionBackend>,
    models: ModelTable,
    policy: RetryPolicy,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn VisionBackend>) -> Self {
        Self {
            backend,
            models: ModelTable::default(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_models(mut self, models: ModelTable) -> Self {
        self.models = models;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Analyze one frame.
    ///
    /// Quota and availability errors switch to the next untried tier
    /// immediately; everything else costs one attempt and waits
    /// `attempt × backoff` before the next one.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        if request.image.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        if request.prompt.trim().is_empty() {
            return Err(AnalysisError::EmptyPrompt);
        }

        let retries = self.policy.retries.max(1);
        let mut tier = BackendTier::initial(request.quality);
        let mut tried: HashSet<BackendTier> = HashSet::new();
        let mut attempt = 1u32;

        loop {
            tried.insert(tier);
            let model = self.models.model(tier);
            debug!(%tier, model, attempt, "Sending analysis request");

            let error = match self.backend.generate(model, request).await {
                Ok(Some(text)) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => return Ok(EMPTY_RESULT_TEXT.to_string()),
                Err(e) => e,
            };

            let kind = error.kind();
            warn!(
                "Analysis error ({}, attempt {}/{}): {}",
                model, attempt, retries, error
            );

            if let Some(next) = next_tier(tier, kind).filter(|t| !tried.contains(t)) {
                warn!(
                    "{:?} on {} tier, switching to {} ({})",
                    kind,
                    tier,
                    next,
                    self.models.model(next)
                );
                tier = next;
                continue;
            }
            if kind.triggers_fallback() && tier.is_last_resort() {
                debug!(%tier, "Last resort tier failed, retrying in place");
            }

            if attempt >= retries {
                return Err(AnalysisError::Exhausted {
                    kind: FailureKind::of(&error),
                    attempts: attempt,
                    tier,
                    last_error: error,
                });
            }

            tokio::time::sleep(self.policy.backoff * attempt).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl FrameAnalyzer for AnalysisClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<String, AnalysisError> {
        AnalysisClient::analyze(self, &request).await
    }
}
