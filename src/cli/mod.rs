//! CLI command implementations

pub mod analyze;
pub mod init;
pub mod run;
pub mod settings;

use clap::ValueEnum;

/// `on` / `off` flag value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

pub(crate) fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
