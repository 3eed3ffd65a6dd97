//! Exclusive utterance control

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::SpeechEngine;

/// How an utterance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEnd {
    /// Read out completely
    Finished,
    /// The engine failed; reported after the grace delay
    Failed,
    /// Interrupted by [`Speaker::stop`] or a newer utterance
    Cancelled,
}

/// A started utterance. Await [`Utterance::end`] (or spawn it) to learn how it ended.
pub struct Utterance {
    pub id: u64,
    pub end: BoxFuture<'static, SpeechEnd>,
}

struct Active {
    id: u64,
    token: CancellationToken,
    finished: Arc<AtomicBool>,
}

/// Keeps at most one utterance alive.
///
/// Starting a new utterance cancels the previous one first, so two
/// utterances are never audible at the same time.
pub struct Speaker {
    engine: Arc<dyn SpeechEngine>,
    grace: Duration,
    current: Option<Active>,
    next_id: u64,
}

impl Speaker {
    /// `grace` is how long a failed utterance waits before reporting completion
    pub fn new(engine: Arc<dyn SpeechEngine>, grace: Duration) -> Self {
        Self {
            engine,
            grace,
            current: None,
            next_id: 1,
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Start speaking `text`, cancelling any utterance still in progress
    pub fn speak(&mut self, text: impl Into<String>, rate: f32) -> Utterance {
        self.stop();

        let id = self.next_id;
        self.next_id += 1;

        let token = CancellationToken::new();
        let finished = Arc::new(AtomicBool::new(false));
        self.current = Some(Active {
            id,
            token: token.clone(),
            finished: finished.clone(),
        });

        let engine = self.engine.clone();
        let grace = self.grace;
        let text = text.into();
        debug!(id, engine = engine.name(), "Speaking: {}", text);

        let end = async move {
            let end = tokio::select! {
                result = engine.speak(&text, rate) => match result {
                    Ok(()) => SpeechEnd::Finished,
                    Err(e) => {
                        warn!("Speech error: {}", e);
                        tokio::select! {
                            _ = tokio::time::sleep(grace) => SpeechEnd::Failed,
                            _ = token.cancelled() => SpeechEnd::Cancelled,
                        }
                    }
                },
                _ = token.cancelled() => SpeechEnd::Cancelled,
            };
            finished.store(true, Ordering::SeqCst);
            end
        }
        .boxed();

        Utterance { id, end }
    }

    /// Cancel the current utterance. Returns `true` if one was still in progress.
    pub fn stop(&mut self) -> bool {
        match self.current.take() {
            Some(active) if !active.finished.load(Ordering::SeqCst) => {
                debug!(id = active.id, "Cancelling utterance");
                active.token.cancel();
                self.engine.stop();
                true
            }
            _ => false,
        }
    }

    /// Id of the utterance in progress, if any
    pub fn current(&self) -> Option<u64> {
        self.current
            .as_ref()
            .filter(|active| !active.finished.load(Ordering::SeqCst))
            .map(|active| active.id)
    }

    pub fn is_speaking(&self) -> bool {
        self.current().is_some()
    }
}
