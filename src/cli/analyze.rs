//! One-shot analysis of an image file

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use visionai::analysis::{AnalysisRequest, QualityTier};
use visionai::capture::Frame;
use visionai::config::Config;
use visionai::speech::{Speaker, detect_engine};
use visionai::{AppMode, ChatHistory, classify_navigation};

pub async fn analyze_command(
    config_path: &Path,
    image: &Path,
    mode: AppMode,
    question: Option<String>,
    speak: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let frame = read_frame(image)?;

    let (prompt, quality) = match question {
        Some(question) => (ChatHistory::new().build_prompt(&question), QualityTier::Deep),
        None => {
            let prompt = mode
                .prompt()
                .context("Chat mode needs a --question")?;
            (prompt.to_string(), mode.quality_tier())
        }
    };

    let client = config.analysis.client();
    let text = match client.analyze(&AnalysisRequest::new(frame, prompt, quality)).await {
        Ok(text) => text,
        Err(err) => match err.spoken_text() {
            Some(degraded) => {
                warn!("{}", err);
                degraded.to_string()
            }
            None => return Err(err.into()),
        },
    };

    println!("{}", text);

    if mode == AppMode::Navigate {
        if let Some(cue) = classify_navigation(&text) {
            println!(
                "Hazard: {:?} ({:?}), haptic {}",
                cue.level, cue.direction, cue.haptic
            );
        }
    }

    if speak {
        let engine = detect_engine(&config.speech)?;
        let mut speaker = Speaker::new(engine, config.session.speech_grace());
        speaker.speak(text, config.settings.speech_rate).end.await;
    }

    Ok(())
}

/// Raw image bytes, or a base64 data URL stored in a text file
fn read_frame(path: &Path) -> Result<Frame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;

    if bytes.starts_with(b"data:") {
        let text = String::from_utf8(bytes).context("Data URL is not valid UTF-8")?;
        return Frame::from_data_url(text.trim())
            .with_context(|| format!("Invalid data URL in {}", path.display()));
    }

    let frame = Frame::new(bytes);
    if frame.is_empty() {
        anyhow::bail!("Image is empty: {}", path.display());
    }
    Ok(frame)
}
