//! Recognizer lifecycle

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::orchestrator::SessionSnapshot;

/// One event from a speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Transcript(String),
    /// Nothing was heard before the recognizer timed out
    NoSpeech,
    Error(String),
    /// The recognizer session ended on its own and must be restarted
    Ended,
}

/// A speech recognizer
#[async_trait]
pub trait TranscriptSource: Send {
    async fn start(&mut self) -> Result<()>;
    async fn stop(&mut self);

    /// Next event while started. `None` once the source is gone for good.
    async fn next_event(&mut self) -> Option<Recognition>;
}

/// Keeps a [`TranscriptSource`] running while voice control is enabled.
///
/// Transcripts are forwarded only while enabled, "no speech" events are
/// ignored, and a recognizer that ends on its own is restarted.
pub struct VoiceListener<S> {
    source: S,
    snapshot: watch::Receiver<SessionSnapshot>,
}

impl<S: TranscriptSource> VoiceListener<S> {
    pub fn new(source: S, snapshot: watch::Receiver<SessionSnapshot>) -> Self {
        Self { source, snapshot }
    }

    fn enabled(&self) -> bool {
        self.snapshot.borrow().voice_enabled()
    }

    /// Run until the source closes or the session goes away
    pub async fn run<F>(mut self, mut forward: F) -> Result<()>
    where
        F: FnMut(String) + Send,
    {
        let mut listening = false;

        loop {
            if !self.enabled() {
                if listening {
                    self.source.stop().await;
                    listening = false;
                    info!("Voice control off");
                }
                if self.snapshot.changed().await.is_err() {
                    break;
                }
                continue;
            }

            if !listening {
                self.source.start().await?;
                listening = true;
                info!("Voice control listening");
            }

            tokio::select! {
                changed = self.snapshot.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                event = self.source.next_event() => match event {
                    Some(Recognition::Transcript(text)) => {
                        if self.enabled() {
                            debug!("Voice input: {}", text);
                            forward(text);
                        }
                    }
                    Some(Recognition::NoSpeech) => {}
                    Some(Recognition::Error(e)) => warn!("Voice recognition error: {}", e),
                    Some(Recognition::Ended) => {
                        debug!("Recognizer ended, resuming");
                        listening = false;
                    }
                    None => break,
                },
            }
        }

        if listening {
            self.source.stop().await;
        }
        Ok(())
    }
}

/// Transcripts pushed through a channel, e.g. typed lines standing in for speech
pub struct ChannelTranscripts {
    rx: mpsc::UnboundedReceiver<String>,
}

impl ChannelTranscripts {
    pub fn channel() -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl TranscriptSource for ChannelTranscripts {
    async fn start(&mut self) -> Result<()> {
        // Anything queued while stopped was never heard
        while self.rx.try_recv().is_ok() {}
        Ok(())
    }

    async fn stop(&mut self) {}

    async fn next_event(&mut self) -> Option<Recognition> {
        match self.rx.recv().await {
            Some(text) if text.trim().is_empty() => Some(Recognition::NoSpeech),
            Some(text) => Some(Recognition::Transcript(text)),
            None => None,
        }
    }
}
