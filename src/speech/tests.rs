use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::time::Instant;

use super::*;

/// Records speak/stop calls. Utterances take `duration`; texts starting with "fail" error out.
struct RecordingEngine {
    duration: Duration,
    events: Mutex<Vec<String>>,
}

impl RecordingEngine {
    fn new(duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            duration,
            events: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechEngine for RecordingEngine {
    async fn speak(&self, text: &str, _rate: f32) -> Result<()> {
        self.events.lock().unwrap().push(format!("speak:{}", text));
        if text.starts_with("fail") {
            return Err(anyhow!("engine unavailable"));
        }
        tokio::time::sleep(self.duration).await;
        Ok(())
    }

    fn stop(&self) {
        self.events.lock().unwrap().push("stop".to_string());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn speaker(engine: &Arc<RecordingEngine>) -> Speaker {
    Speaker::new(engine.clone(), Duration::from_millis(500))
}

#[tokio::test(start_paused = true)]
async fn test_utterance_finishes() {
    let engine = RecordingEngine::new(Duration::from_secs(2));
    let mut speaker = speaker(&engine);

    let start = Instant::now();
    let utterance = speaker.speak("Hello", 1.0);
    assert_eq!(utterance.id, 1);
    assert!(speaker.is_speaking());

    assert_eq!(utterance.end.await, SpeechEnd::Finished);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert!(!speaker.is_speaking());
    assert!(!speaker.stop());
}

#[tokio::test(start_paused = true)]
async fn test_new_utterance_cancels_previous_once() {
    let engine = RecordingEngine::new(Duration::from_secs(5));
    let mut speaker = speaker(&engine);

    let first = tokio::spawn(speaker.speak("first", 1.0).end);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = speaker.speak("second", 1.0);
    assert_eq!(second.id, 2);
    assert_eq!(first.await.unwrap(), SpeechEnd::Cancelled);
    assert_eq!(second.end.await, SpeechEnd::Finished);

    assert_eq!(engine.events(), vec!["speak:first", "stop", "speak:second"]);
}

#[tokio::test(start_paused = true)]
async fn test_finished_utterance_is_not_cancelled_again() {
    let engine = RecordingEngine::new(Duration::from_millis(200));
    let mut speaker = speaker(&engine);

    assert_eq!(speaker.speak("one", 1.0).end.await, SpeechEnd::Finished);
    assert_eq!(speaker.speak("two", 1.0).end.await, SpeechEnd::Finished);

    assert_eq!(engine.events(), vec!["speak:one", "speak:two"]);
}

#[tokio::test(start_paused = true)]
async fn test_engine_error_completes_after_grace() {
    let engine = RecordingEngine::new(Duration::from_secs(1));
    let mut speaker = speaker(&engine);

    let start = Instant::now();
    assert_eq!(speaker.speak("fail now", 1.0).end.await, SpeechEnd::Failed);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_grace_cancels() {
    let engine = RecordingEngine::new(Duration::from_secs(1));
    let mut speaker = speaker(&engine);

    let failing = tokio::spawn(speaker.speak("fail later", 1.0).end);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(speaker.stop());
    assert_eq!(failing.await.unwrap(), SpeechEnd::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_console_speech_paces_by_words() {
    let engine = ConsoleSpeech;
    let start = Instant::now();
    engine.speak("one two three four five", 1.0).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    let start = Instant::now();
    engine.speak("one two three four five", 2.0).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}

#[test]
fn test_command_args_scale_rate() {
    let say = CommandSpeech::new("say");
    assert_eq!(say.args("hi", 1.0), vec!["-r", "175", "hi"]);

    let espeak = CommandSpeech::new("espeak-ng");
    assert_eq!(espeak.args("hi", 2.0), vec!["-s", "350", "hi"]);
}
