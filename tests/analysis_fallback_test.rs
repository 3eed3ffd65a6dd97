//! Backend tier fallback through the public analysis API

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use visionai::analysis::{
    AnalysisClient, AnalysisError, AnalysisRequest, BackendError, BackendTier, FailureKind,
    QualityTier, RetryPolicy, VisionBackend,
};
use visionai::capture::Frame;

/// Fails every model except `healthy` with the given status
struct FlakyBackend {
    healthy: Option<&'static str>,
    status: u16,
    calls: Mutex<Vec<String>>,
}

impl FlakyBackend {
    fn new(healthy: Option<&'static str>, status: u16) -> Arc<Self> {
        Arc::new(Self {
            healthy,
            status,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionBackend for FlakyBackend {
    async fn generate(
        &self,
        model: &str,
        _request: &AnalysisRequest,
    ) -> Result<Option<String>, BackendError> {
        self.calls.lock().unwrap().push(model.to_string());
        if Some(model) == self.healthy {
            Ok(Some(format!("answer from {}", model)))
        } else {
            Err(BackendError::status(self.status, "request failed"))
        }
    }
}

fn request(quality: QualityTier) -> AnalysisRequest {
    AnalysisRequest::new(
        Frame::new(vec![0xff, 0xd8, 0xff, 0xe0]),
        "Describe the scene.",
        quality,
    )
}

fn client(backend: Arc<FlakyBackend>) -> AnalysisClient {
    AnalysisClient::new(backend).with_policy(RetryPolicy {
        retries: 3,
        backoff: Duration::from_millis(100),
    })
}

#[tokio::test(start_paused = true)]
async fn test_quota_falls_through_to_safe_tier() {
    let backend = FlakyBackend::new(Some("gemini-flash-latest"), 429);
    let start = Instant::now();

    let text = client(backend.clone())
        .analyze(&request(QualityTier::Fast))
        .await
        .unwrap();

    assert_eq!(text, "answer from gemini-flash-latest");
    assert_eq!(
        backend.calls(),
        vec!["gemini-3-flash-preview", "gemini-2.0-flash", "gemini-flash-latest"]
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_deep_tier_exhausts_with_category() {
    let backend = FlakyBackend::new(None, 404);

    let err = client(backend.clone())
        .analyze(&request(QualityTier::Deep))
        .await
        .unwrap_err();

    match &err {
        AnalysisError::Exhausted { kind, tier, .. } => {
            assert_eq!(*kind, FailureKind::Unavailable);
            assert_eq!(*tier, BackendTier::Safe);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.spoken_text(),
        Some("Model unavailable. Please try again later.")
    );

    let calls = backend.calls();
    assert_eq!(calls[0], "gemini-3-pro-preview");
    assert_eq!(calls[1], "gemini-2.0-flash");
    // Only the last-resort tier is retried, up to the budget
    assert_eq!(calls.len(), 2 + 3);
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_stay_on_tier() {
    let backend = FlakyBackend::new(None, 500);
    let start = Instant::now();

    let err = client(backend.clone())
        .analyze(&request(QualityTier::Fast))
        .await
        .unwrap_err();

    assert_eq!(backend.calls(), vec!["gemini-3-flash-preview"; 3]);
    assert_eq!(err.failure_kind(), Some(FailureKind::Network));
    // 100ms after the first attempt, 200ms after the second
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}
