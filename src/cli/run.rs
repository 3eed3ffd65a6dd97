//! Interactive session on the terminal.
//!
//! Each input line stands in for a key press, a recognized phrase or a chat
//! message; see [`HELP`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::on_off;
use visionai::capture::{CaptureSource, FileCapture};
use visionai::config::SettingsStore;
use visionai::cue::LogCues;
use visionai::orchestrator::{
    Input, Orchestrator, OrchestratorHandle, RunningSession, SessionSnapshot, Toast, ToastLevel,
};
use visionai::speech::{Speaker, detect_engine};
use visionai::voice::{ChannelTranscripts, VoiceListener};
use visionai::{AppMode, Shortcut};

const HELP: &str = "\
Keys:  <enter>/space  start or stop    esc  stop everything    r  repeat
       1-6  scene, read, object, navigate, color, chat
Lines: /clear  clear chat    /online, /offline    /voice on|off    /help    /quit
Anything else is a spoken phrase while voice is on, or a chat question in chat mode.";

pub async fn run_command(
    config_path: &Path,
    frame: Option<PathBuf>,
    mode: Option<AppMode>,
) -> Result<()> {
    let store = SettingsStore::open(config_path)?;
    let config = store.config().clone();

    let frame_path = frame
        .or_else(|| config.capture.frame_path())
        .context("No frame source: pass --frame or set capture.frame_path")?;
    let capture = Arc::new(FileCapture::new(frame_path));
    if !capture.is_ready() {
        warn!("Frame file {} does not exist yet", capture.path().display());
    }

    let engine = detect_engine(&config.speech)?;
    let speaker = Speaker::new(engine, config.session.speech_grace());
    let analyzer = Arc::new(config.analysis.client());

    let RunningSession {
        handle,
        toasts,
        task,
    } = Orchestrator::new(analyzer, capture, speaker, Arc::new(LogCues))
        .with_store(store)
        .with_mode(mode.unwrap_or_default())
        .with_navigate_delay(config.session.navigate_delay())
        .spawn();

    tokio::spawn(print_toasts(toasts));
    tokio::spawn(print_status(handle.clone()));

    let (transcript_tx, transcripts) = ChannelTranscripts::channel();
    let listener = VoiceListener::new(transcripts, handle.subscribe());
    let voice_handle = handle.clone();
    tokio::spawn(async move {
        let result = listener
            .run(|text| {
                voice_handle.send(Input::Transcript(text));
            })
            .await;
        if let Err(e) = result {
            warn!("Voice listener stopped: {:#}", e);
        }
    });

    println!("{}\n", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !dispatch(&handle, &transcript_tx, &line) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown();
    task.await.context("Session task failed")?;
    Ok(())
}

/// Route one input line. Returns `false` to end the session.
fn dispatch(
    handle: &OrchestratorHandle,
    transcripts: &mpsc::UnboundedSender<String>,
    line: &str,
) -> bool {
    let text = line.trim();
    let key = if text.is_empty() { " " } else { text };
    if let Some(shortcut) = Shortcut::from_key(key) {
        handle.send(shortcut);
        return true;
    }

    let snapshot = handle.snapshot();
    match text {
        "/quit" | "/exit" => return false,
        "/help" => println!("{}", HELP),
        "/clear" => {
            handle.send(Input::ClearChat);
        }
        "/online" => {
            handle.send(Input::Connectivity { online: true });
        }
        "/offline" => {
            handle.send(Input::Connectivity { online: false });
        }
        "/voice on" | "/voice off" => {
            let mut settings = snapshot.settings;
            settings.voice_enabled = text.ends_with("on");
            handle.send(Input::UpdateSettings(settings));
        }
        command if command.starts_with('/') => println!("Unknown command: {}", command),
        phrase => {
            if snapshot.voice_enabled() {
                let _ = transcripts.send(phrase.to_string());
            } else if snapshot.mode == AppMode::Chat {
                handle.send(Input::ChatSubmit(phrase.to_string()));
            } else {
                println!("Voice is off. Use /voice on, or press 6 to chat.");
            }
        }
    }
    true
}

async fn print_toasts(mut toasts: mpsc::UnboundedReceiver<Toast>) {
    while let Some(toast) = toasts.recv().await {
        let marker = match toast.level {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        };
        println!("{} {}", marker, toast.message);
    }
}

/// Print a status line whenever mode, activity or settings change
async fn print_status(handle: OrchestratorHandle) {
    let mut updates = handle.subscribe();
    let mut last: Option<(AppMode, bool, bool)> = None;
    let mut last_settings = None;

    loop {
        let snapshot: SessionSnapshot = updates.borrow_and_update().clone();
        let status = (snapshot.mode, snapshot.active, snapshot.online);
        if last != Some(status) {
            println!(
                "[{}] {}{}",
                snapshot.mode.label(),
                if snapshot.active { "running" } else { "idle" },
                if snapshot.online { "" } else { " (offline)" }
            );
            last = Some(status);
        }
        if last_settings != Some(snapshot.settings) {
            if last_settings.is_some() {
                info!(
                    "Settings: rate {:.2}, voice {}, haptics {}",
                    snapshot.settings.speech_rate,
                    on_off(snapshot.settings.voice_enabled),
                    on_off(snapshot.settings.haptics_enabled)
                );
            }
            last_settings = Some(snapshot.settings);
        }

        if updates.changed().await.is_err() {
            break;
        }
    }
}
