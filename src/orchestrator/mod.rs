//! The session orchestrator.
//!
//! A session runs as one task that owns all session state. Inputs (toggle,
//! mode switches, transcripts, chat, connectivity) arrive on a channel;
//! analysis, speech and loop-delay work runs in spawned tasks that report
//! back as continuations tagged with the epoch that started them. Ending an
//! epoch (deactivation) cancels its token, so stale timers and results never
//! act.
//!
//! ```text
//! toggle ─► "Starting Scene" ─► capture ─► analyze ─► speak ─┬─► idle (single-shot)
//!                                  ▲                         │
//!                                  └──── navigate delay ─────┘ (Navigate, while active)
//! ```

mod input;
mod session;
mod state;


pub use input::{Input, Toast, ToastLevel};
pub use state::{Phase, READY_TEXT, SessionSnapshot};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::analysis::FrameAnalyzer;
use crate::capture::CaptureSource;
use crate::config::{Settings, SettingsStore};
use crate::cue::CueSink;
use crate::domain::AppMode;
use crate::speech::Speaker;
use session::Session;
use state::SessionState;

/// Default pause between navigation narrations
pub const DEFAULT_NAVIGATE_DELAY: Duration = Duration::from_millis(1500);

/// Session builder
pub struct Orchestrator {
    analyzer: Arc<dyn FrameAnalyzer>,
    capture: Arc<dyn CaptureSource>,
    cues: Arc<dyn CueSink>,
    speaker: Speaker,
    store: Option<SettingsStore>,
    settings: Settings,
    mode: AppMode,
    navigate_delay: Duration,
}

impl Orchestrator {
    pub fn new(
        analyzer: Arc<dyn FrameAnalyzer>,
        capture: Arc<dyn CaptureSource>,
        speaker: Speaker,
        cues: Arc<dyn CueSink>,
    ) -> Self {
        Self {
            analyzer,
            capture,
            cues,
            speaker,
            store: None,
            settings: Settings::default(),
            mode: AppMode::default(),
            navigate_delay: DEFAULT_NAVIGATE_DELAY,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings.normalized();
        self
    }

    /// Persist settings changes through `store`; its settings become the initial ones
    pub fn with_store(mut self, store: SettingsStore) -> Self {
        self.settings = store.settings();
        self.store = Some(store);
        self
    }

    pub fn with_mode(mut self, mode: AppMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_navigate_delay(mut self, delay: Duration) -> Self {
        self.navigate_delay = delay;
        self
    }

    /// Start the session task
    pub fn spawn(self) -> RunningSession {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (toast_tx, toast_rx) = mpsc::unbounded_channel();
        let (continuation_tx, continuation_rx) = mpsc::unbounded_channel();

        let state = SessionState::new(self.mode, self.settings);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot(false));

        let session = Session::new(
            self.analyzer,
            self.capture,
            self.cues,
            self.speaker,
            self.store,
            self.navigate_delay,
            state,
            snapshot_tx,
            toast_tx,
            continuation_tx,
        );
        let task = tokio::spawn(session.run(input_rx, continuation_rx));

        RunningSession {
            handle: OrchestratorHandle {
                inputs: input_tx,
                snapshot: snapshot_rx,
            },
            toasts: toast_rx,
            task,
        }
    }
}

/// A spawned session
pub struct RunningSession {
    pub handle: OrchestratorHandle,
    pub toasts: mpsc::UnboundedReceiver<Toast>,
    pub task: JoinHandle<()>,
}

/// Cloneable access to a running session
#[derive(Clone)]
pub struct OrchestratorHandle {
    inputs: mpsc::UnboundedSender<Input>,
    snapshot: watch::Receiver<SessionSnapshot>,
}

impl OrchestratorHandle {
    /// Queue an input. Returns `false` once the session has stopped.
    pub fn send(&self, input: impl Into<Input>) -> bool {
        self.inputs.send(input.into()).is_ok()
    }

    /// Latest published state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every published state
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    pub fn shutdown(&self) {
        let _ = self.inputs.send(Input::Shutdown);
    }
}
