//! Settings command implementation

use std::path::Path;

use anyhow::Result;

use super::{Switch, on_off};
use visionai::config::SettingsStore;

/// Show the persisted settings, applying any changes first
pub fn settings_command(
    config_path: &Path,
    speech_rate: Option<f32>,
    voice: Option<Switch>,
    haptics: Option<Switch>,
) -> Result<()> {
    let mut store = SettingsStore::open(config_path)?;

    if speech_rate.is_some() || voice.is_some() || haptics.is_some() {
        store.update(|settings| {
            if let Some(rate) = speech_rate {
                settings.speech_rate = rate;
            }
            if let Some(voice) = voice {
                settings.voice_enabled = voice.enabled();
            }
            if let Some(haptics) = haptics {
                settings.haptics_enabled = haptics.enabled();
            }
        })?;
        println!("Saved: {}\n", store.path().display());
    }

    let settings = store.settings();
    println!("Settings:");
    println!("  speech rate: {:.2}", settings.speech_rate);
    println!("  voice:       {}", on_off(settings.voice_enabled));
    println!("  haptics:     {}", on_off(settings.haptics_enabled));
    Ok(())
}
