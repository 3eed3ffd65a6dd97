use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use visionai::AppMode;
use visionai::config::Config;

mod cli;

use cli::Switch;

#[derive(Parser)]
#[command(name = "visionai")]
#[command(about = "VisionAI - spoken scene descriptions and navigation cues from camera frames")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.visionai/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session (the default)
    Run {
        /// Image file an external camera tool keeps overwriting
        #[arg(long)]
        frame: Option<PathBuf>,

        /// Starting mode: scene, read, object, navigate, color or chat
        #[arg(short, long)]
        mode: Option<AppMode>,
    },

    /// Analyze a single image and print the result
    Analyze {
        /// Image file (JPEG, PNG, WebP) or a text file holding a data URL
        #[arg(long)]
        image: PathBuf,

        #[arg(short, long, default_value = "scene")]
        mode: AppMode,

        /// Ask a question about the image instead of using the mode prompt
        #[arg(short, long)]
        question: Option<String>,

        /// Also read the result aloud
        #[arg(long)]
        speak: bool,
    },

    /// Show or change the persisted settings
    Settings {
        /// Speech rate multiplier (0.5 to 2.0)
        #[arg(long)]
        speech_rate: Option<f32>,

        /// Voice commands
        #[arg(long, value_enum)]
        voice: Option<Switch>,

        /// Vibration feedback
        #[arg(long, value_enum)]
        haptics: Option<Switch>,
    },

    /// Write a commented default configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);

    match cli.command {
        Some(Commands::Run { frame, mode }) => {
            cli::run::run_command(&config_path, frame, mode).await?;
        }
        Some(Commands::Analyze {
            image,
            mode,
            question,
            speak,
        }) => {
            cli::analyze::analyze_command(&config_path, &image, mode, question, speak).await?;
        }
        Some(Commands::Settings {
            speech_rate,
            voice,
            haptics,
        }) => {
            cli::settings::settings_command(&config_path, speech_rate, voice, haptics)?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(&config_path, force)?;
        }
        None => {
            // Default: interactive session
            cli::run::run_command(&config_path, None, None).await?;
        }
    }

    Ok(())
}
