//! Init command implementation

use std::path::Path;

use anyhow::Result;

use visionai::config::Config;

/// Write the commented default configuration to `config_path`
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    Config::write_default(config_path, force)?;
    println!("Created: {}", config_path.display());
    println!("Set GEMINI_API_KEY (or analysis.api_key) before running a session.");
    Ok(())
}
