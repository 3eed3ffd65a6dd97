//! Session state and its transitions

use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::domain::{AppMode, ChatHistory, ChatMessage};

/// Transcript shown before any result and after a mode switch
pub const READY_TEXT: &str = "Ready";

/// Coarse session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Capturing and waiting for analysis
    Requesting,
    /// A result or announcement is being read out
    Speaking,
}

/// Read-only view of the session, published after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub processing: bool,
    pub speaking: bool,
    pub mode: AppMode,
    pub last_text: String,
    pub chat: Vec<ChatMessage>,
    pub settings: Settings,
    pub online: bool,
    pub epoch: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            active: false,
            processing: false,
            speaking: false,
            mode: AppMode::default(),
            last_text: READY_TEXT.to_string(),
            chat: Vec::new(),
            settings: Settings::default(),
            online: true,
            epoch: 0,
        }
    }
}

impl SessionSnapshot {
    pub fn phase(&self) -> Phase {
        if self.processing {
            Phase::Requesting
        } else if self.speaking {
            Phase::Speaking
        } else {
            Phase::Idle
        }
    }

    pub fn voice_enabled(&self) -> bool {
        self.settings.voice_enabled
    }
}

/// Mutable session state, owned by the session task.
///
/// `active` keeps the capture loop going; `processing` marks a request in
/// flight. Every deactivation starts a new epoch and cancels the token of
/// the old one, so work spawned before it can no longer act.
#[derive(Debug)]
pub(super) struct SessionState {
    active: bool,
    processing: bool,
    epoch: u64,
    token: CancellationToken,
    pub(super) mode: AppMode,
    pub(super) last_text: String,
    pub(super) chat: ChatHistory,
    pub(super) settings: Settings,
    pub(super) online: bool,
}

impl SessionState {
    pub(super) fn new(mode: AppMode, settings: Settings) -> Self {
        Self {
            active: false,
            processing: false,
            epoch: 0,
            token: CancellationToken::new(),
            mode,
            last_text: READY_TEXT.to_string(),
            chat: ChatHistory::new(),
            settings,
            online: true,
        }
    }

    pub(super) fn is_active(&self) -> bool {
        self.active
    }

    pub(super) fn is_processing(&self) -> bool {
        self.processing
    }

    pub(super) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(super) fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Token cancelled when the current epoch ends
    pub(super) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Turn the loop on. Chat mode never loops.
    pub(super) fn activate(&mut self) -> bool {
        if self.active || !self.mode.uses_loop() {
            return false;
        }
        self.active = true;
        true
    }

    /// Mark a request in flight. Refused while one already is.
    pub(super) fn begin_request(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        true
    }

    pub(super) fn settle_request(&mut self) {
        self.processing = false;
    }

    /// A single-shot cycle is over
    pub(super) fn finish_cycle(&mut self) {
        self.active = false;
        self.processing = false;
    }

    /// Stop the loop and end the epoch
    pub(super) fn deactivate(&mut self) {
        self.active = false;
        self.processing = false;
        self.token.cancel();
        self.token = CancellationToken::new();
        self.epoch += 1;
    }

    pub(super) fn switch_mode(&mut self, mode: AppMode) {
        self.deactivate();
        self.mode = mode;
        self.last_text = READY_TEXT.to_string();
    }

    pub(super) fn snapshot(&self, speaking: bool) -> SessionSnapshot {
        SessionSnapshot {
            active: self.active,
            processing: self.processing,
            speaking,
            mode: self.mode,
            last_text: self.last_text.clone(),
            chat: self.chat.messages().to_vec(),
            settings: self.settings,
            online: self.online,
            epoch: self.epoch,
        }
    }
}
