//! The session task

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::input::{Continuation, Input, Origin, Settled, Toast, ToastLevel};
use super::state::{SessionSnapshot, SessionState};
use crate::analysis::{AnalysisRequest, FrameAnalyzer};
use crate::capture::CaptureSource;
use crate::config::{Settings, SettingsStore};
use crate::cue::CueSink;
use crate::domain::{
    AppMode, AudioCue, ChatMessage, HapticPattern, Shortcut, classify_navigation,
};
use crate::speech::{SpeechEnd, Speaker, Utterance};
use crate::voice::{self, ControlCommand, HELP_SUMMARY, VoiceCommand};

pub(super) const CAMERA_INITIALIZING: &str = "Camera initializing...";
pub(super) const PROCESSING_ERROR: &str = "Processing error. Please try again.";
pub(super) const OFFLINE: &str = "No internet connection";
pub(super) const ONLINE: &str = "Connection restored";
pub(super) const CHAT_CLEARED: &str = "Chat cleared";
pub(super) const SETTINGS_NOT_SAVED: &str = "Could not save settings";

/// What to do once an utterance has been read out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    Nothing,
    /// Activation announcement: capture the first frame
    Capture,
    /// Loop result: schedule the next cycle or end a single-shot one
    Narration,
}

#[derive(Debug)]
struct PendingSpeech {
    id: u64,
    follow_up: FollowUp,
}

/// Outcome of a capture attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureStart {
    Started,
    /// A request is already in flight
    Busy,
    /// No frame available
    Unavailable,
}

pub(super) struct Session {
    pub(super) analyzer: Arc<dyn FrameAnalyzer>,
    pub(super) capture: Arc<dyn CaptureSource>,
    pub(super) cues: Arc<dyn CueSink>,
    pub(super) speaker: Speaker,
    pub(super) store: Option<SettingsStore>,
    pub(super) navigate_delay: Duration,
    pub(super) state: SessionState,
    pub(super) snapshot_tx: watch::Sender<SessionSnapshot>,
    pub(super) toast_tx: mpsc::UnboundedSender<Toast>,
    pub(super) continuation_tx: mpsc::UnboundedSender<Continuation>,
    pending_speech: Option<PendingSpeech>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        analyzer: Arc<dyn FrameAnalyzer>,
        capture: Arc<dyn CaptureSource>,
        cues: Arc<dyn CueSink>,
        speaker: Speaker,
        store: Option<SettingsStore>,
        navigate_delay: Duration,
        state: SessionState,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        toast_tx: mpsc::UnboundedSender<Toast>,
        continuation_tx: mpsc::UnboundedSender<Continuation>,
    ) -> Self {
        Self {
            analyzer,
            capture,
            cues,
            speaker,
            store,
            navigate_delay,
            state,
            snapshot_tx,
            toast_tx,
            continuation_tx,
            pending_speech: None,
        }
    }

    pub(super) async fn run(
        mut self,
        mut inputs: mpsc::UnboundedReceiver<Input>,
        mut continuations: mpsc::UnboundedReceiver<Continuation>,
    ) {
        info!(mode = %self.state.mode, speech = self.speaker.engine_name(), "Session started");
        self.publish();

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(Input::Shutdown) | None => break,
                    Some(input) => self.handle_input(input),
                },
                Some(continuation) = continuations.recv() => self.handle_continuation(continuation),
            }
            self.publish();
        }

        self.deactivate();
        self.publish();
        info!("Session stopped");
    }

    fn publish(&self) {
        let snapshot = self.state.snapshot(self.speaker.is_speaking());
        self.snapshot_tx.send_replace(snapshot);
    }

    fn toast(&self, level: ToastLevel, message: &str) {
        let _ = self.toast_tx.send(Toast::new(level, message));
    }

    fn vibrate(&self, pattern: HapticPattern) {
        if self.state.settings.haptics_enabled {
            self.cues.vibrate(pattern);
        }
    }

    fn handle_input(&mut self, input: Input) {
        debug!("Input: {:?}", input);
        match input {
            Input::Toggle => self.toggle(),
            Input::Escape => self.escape(),
            Input::SelectMode(mode) => self.select_mode(mode),
            Input::Repeat => self.repeat(),
            Input::Shortcut(shortcut) => match shortcut {
                Shortcut::ToggleActive => self.toggle(),
                Shortcut::Escape => self.escape(),
                Shortcut::SelectMode(mode) => self.select_mode(mode),
                Shortcut::Repeat => self.repeat(),
            },
            Input::Transcript(text) => self.transcript(&text),
            Input::ChatSubmit(text) => {
                if self.state.mode == AppMode::Chat {
                    self.submit_chat(&text);
                } else {
                    debug!("Chat input outside chat mode ignored");
                }
            }
            Input::ClearChat => {
                self.state.chat.clear();
                self.toast(ToastLevel::Info, CHAT_CLEARED);
            }
            Input::Connectivity { online } => self.connectivity(online),
            Input::UpdateSettings(settings) => self.update_settings(settings),
            // Handled by the run loop
            Input::Shutdown => {}
        }
    }

    fn handle_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Analysis {
                epoch,
                origin,
                settled,
            } => {
                if !self.state.is_current(epoch) {
                    debug!(epoch, "Stale analysis result dropped");
                    return;
                }
                self.analysis_settled(origin, settled);
            }
            Continuation::Speech { epoch, id, end } => {
                if !self.state.is_current(epoch) {
                    return;
                }
                self.speech_ended(id, end);
            }
            Continuation::LoopTimer { epoch } => {
                if self.state.is_current(epoch) && self.state.is_active() {
                    self.run_cycle();
                }
            }
        }
    }

    // Loop control

    fn toggle(&mut self) {
        self.vibrate(HapticPattern::CLICK);
        if !self.state.mode.uses_loop() {
            return;
        }

        if self.state.is_active() {
            self.deactivate();
            self.cues.play(AudioCue::Click);
            return;
        }

        if !self.capture.is_ready() {
            self.toast(ToastLevel::Warning, CAMERA_INITIALIZING);
            return;
        }

        if self.state.activate() {
            debug!(mode = %self.state.mode, "Activated");
            let announcement = format!("Starting {}", self.state.mode.label());
            self.speak(announcement, FollowUp::Capture);
        }
    }

    fn escape(&mut self) {
        self.deactivate();
        self.cues.play(AudioCue::Click);
    }

    fn deactivate(&mut self) {
        if self.state.is_active() || self.state.is_processing() {
            debug!("Deactivated");
        }
        self.state.deactivate();
        self.stop_speaking();
    }

    fn stop_speaking(&mut self) {
        self.speaker.stop();
        self.pending_speech = None;
    }

    fn select_mode(&mut self, mode: AppMode) {
        self.cues.play(AudioCue::ModeSwitch);
        self.vibrate(mode.haptic());
        self.stop_speaking();
        self.state.switch_mode(mode);
        debug!(%mode, "Mode switched");
        self.speak(mode.label(), FollowUp::Nothing);
    }

    /// Capture and analyze one frame for the loop, or end the cycle if no frame is available
    fn run_cycle(&mut self) {
        match self.process_frame(None) {
            CaptureStart::Started | CaptureStart::Busy => {}
            CaptureStart::Unavailable => {
                if self.state.is_active() && self.state.mode.is_continuous() {
                    self.schedule_next_cycle();
                } else {
                    self.state.finish_cycle();
                }
            }
        }
    }

    fn process_frame(&mut self, chat_prompt: Option<String>) -> CaptureStart {
        if self.state.is_processing() {
            debug!("Capture ignored: request in flight");
            return CaptureStart::Busy;
        }
        if !self.capture.is_ready() {
            return CaptureStart::Unavailable;
        }
        let Some(frame) = self.capture.capture() else {
            return CaptureStart::Unavailable;
        };

        let mode = self.state.mode;
        let (prompt, origin) = match chat_prompt {
            Some(prompt) => (prompt, Origin::Chat),
            None => match mode.prompt() {
                Some(prompt) => (prompt.to_string(), Origin::Loop),
                None => return CaptureStart::Unavailable,
            },
        };

        self.state.begin_request();
        if origin == Origin::Loop {
            self.cues.play(AudioCue::Shutter);
        }

        let request = AnalysisRequest::new(frame, prompt, mode.quality_tier());
        let analyzer = self.analyzer.clone();
        let token = self.state.token();
        let epoch = self.state.epoch();
        let tx = self.continuation_tx.clone();
        debug!(epoch, ?origin, "Analysis started");

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = AssertUnwindSafe(analyzer.analyze(request)).catch_unwind() => outcome,
            };
            let settled = match outcome {
                Ok(result) => Settled::from_result(result),
                Err(_) => Settled::Failed("analysis task panicked".to_string()),
            };
            let _ = tx.send(Continuation::Analysis {
                epoch,
                origin,
                settled,
            });
        });

        CaptureStart::Started
    }

    fn analysis_settled(&mut self, origin: Origin, settled: Settled) {
        self.state.settle_request();

        let text = match settled {
            Settled::Answer(text) => {
                self.cues.play(AudioCue::Success);
                text
            }
            Settled::Degraded(text) => {
                self.cues.play(AudioCue::Error);
                text
            }
            Settled::Failed(reason) => {
                self.session_failure(&reason);
                return;
            }
        };

        match origin {
            Origin::Chat => {
                self.state.chat.push(ChatMessage::assistant(text.clone()));
                self.speak(text, FollowUp::Nothing);
            }
            Origin::Loop => {
                if self.state.mode == AppMode::Navigate {
                    self.hazard_cues(&text);
                }
                self.state.last_text = text.clone();
                self.speak(text, FollowUp::Narration);
            }
        }
    }

    fn hazard_cues(&self, text: &str) {
        let Some(cue) = classify_navigation(text) else {
            return;
        };
        debug!(level = ?cue.level, direction = ?cue.direction, "Hazard");
        if let Some(audio) = cue.audio {
            self.cues.play(audio);
        }
        self.vibrate(cue.haptic);
    }

    fn narration_done(&mut self) {
        if self.state.is_active() && self.state.mode.is_continuous() {
            self.schedule_next_cycle();
        } else {
            self.state.finish_cycle();
        }
    }

    fn schedule_next_cycle(&self) {
        let token = self.state.token();
        let epoch = self.state.epoch();
        let delay = self.navigate_delay;
        let tx = self.continuation_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(Continuation::LoopTimer { epoch });
                }
            }
        });
    }

    fn session_failure(&mut self, reason: &str) {
        error!("Session failure: {}", reason);
        self.cues.play(AudioCue::Error);
        self.toast(ToastLevel::Error, PROCESSING_ERROR);
        self.deactivate();
    }

    // Speech

    /// Start an utterance. Speech without a follow-up of its own takes over
    /// the one of the utterance it interrupts, so the loop keeps going.
    fn speak(&mut self, text: impl Into<String>, follow_up: FollowUp) {
        let follow_up = match follow_up {
            FollowUp::Nothing => self
                .pending_speech
                .take()
                .map(|pending| pending.follow_up)
                .unwrap_or(FollowUp::Nothing),
            own => own,
        };
        let Utterance { id, end } = self.speaker.speak(text, self.state.settings.speech_rate);
        self.pending_speech = Some(PendingSpeech { id, follow_up });

        let epoch = self.state.epoch();
        let tx = self.continuation_tx.clone();
        tokio::spawn(async move {
            let end = end.await;
            let _ = tx.send(Continuation::Speech { epoch, id, end });
        });
    }

    fn repeat(&mut self) {
        let text = self.state.last_text.clone();
        self.speak(text, FollowUp::Nothing);
    }

    fn speech_ended(&mut self, id: u64, end: SpeechEnd) {
        let Some(pending) = self.pending_speech.take_if(|pending| pending.id == id) else {
            return;
        };
        if end == SpeechEnd::Cancelled {
            return;
        }

        match pending.follow_up {
            FollowUp::Nothing => {}
            FollowUp::Capture => {
                if self.state.is_active() {
                    self.run_cycle();
                }
            }
            FollowUp::Narration => self.narration_done(),
        }
    }

    // Chat and voice

    fn submit_chat(&mut self, question: &str) {
        let question = question.trim();
        if question.is_empty() {
            return;
        }
        if !self.capture.is_ready() {
            self.toast(ToastLevel::Warning, CAMERA_INITIALIZING);
            return;
        }
        if self.state.is_processing() {
            debug!("Chat question ignored: request in flight");
            return;
        }

        self.cues.play(AudioCue::Click);
        let prompt = self.state.chat.build_prompt(question);
        self.state.chat.push(ChatMessage::user(question));
        self.process_frame(Some(prompt));
    }

    fn transcript(&mut self, text: &str) {
        if !self.state.settings.voice_enabled {
            debug!("Transcript ignored: voice control off");
            return;
        }
        match voice::parse(text, self.state.mode == AppMode::Chat) {
            Some(command) => self.voice_command(command),
            None => debug!("No command in transcript: {}", text),
        }
    }

    fn voice_command(&mut self, command: VoiceCommand) {
        debug!("Voice command: {:?}", command);
        match command {
            VoiceCommand::Chat(text) => {
                if !text.is_empty() {
                    self.cues.play(AudioCue::Success);
                    self.submit_chat(&text);
                }
            }
            VoiceCommand::Ask(question) => {
                self.cues.play(AudioCue::Success);
                if self.state.mode != AppMode::Chat {
                    self.stop_speaking();
                    self.state.switch_mode(AppMode::Chat);
                }
                self.submit_chat(&question);
            }
            VoiceCommand::Control(control) => {
                self.cues.play(AudioCue::Success);
                match control {
                    ControlCommand::Start => {
                        if !self.state.is_active() && self.state.mode.uses_loop() {
                            self.toggle();
                        }
                    }
                    ControlCommand::Stop => {
                        if self.state.is_active() {
                            self.toggle();
                        } else {
                            self.stop_speaking();
                        }
                    }
                    ControlCommand::Help => self.speak(HELP_SUMMARY, FollowUp::Nothing),
                    other => {
                        if let Some(mode) = other.mode() {
                            self.select_mode(mode);
                        }
                    }
                }
            }
        }
    }

    // Environment

    fn connectivity(&mut self, online: bool) {
        if online {
            if !self.state.online {
                self.state.online = true;
                info!("Back online");
                self.toast(ToastLevel::Success, ONLINE);
            }
            return;
        }

        warn!("Connection lost");
        self.state.online = false;
        self.cues.play(AudioCue::Error);
        self.toast(ToastLevel::Error, OFFLINE);
        self.deactivate();
    }

    fn update_settings(&mut self, settings: Settings) {
        let settings = settings.normalized();
        if settings == self.state.settings {
            return;
        }
        self.state.settings = settings;

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.replace(settings) {
                warn!("Failed to save settings: {:#}", e);
                self.toast(ToastLevel::Warning, SETTINGS_NOT_SAVED);
            }
        }
    }
}
