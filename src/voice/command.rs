use crate::domain::AppMode;

/// Spoken in reply to the help command
pub const HELP_SUMMARY: &str = "Say start or stop to control narration. Say scene, read, object, navigate, color or chat to switch modes. Say ask, followed by your question, to ask about what the camera sees.";

/// Fixed control commands, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    Start,
    Stop,
    Scene,
    Read,
    Object,
    Navigate,
    Color,
    Chat,
    Help,
}

impl ControlCommand {
    pub const ALL: [ControlCommand; 9] = [
        ControlCommand::Start,
        ControlCommand::Stop,
        ControlCommand::Scene,
        ControlCommand::Read,
        ControlCommand::Object,
        ControlCommand::Navigate,
        ControlCommand::Color,
        ControlCommand::Chat,
        ControlCommand::Help,
    ];

    /// Trigger words and phrases, matched on word boundaries
    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            ControlCommand::Start => &["start", "begin", "go"],
            ControlCommand::Stop => &["stop", "pause", "halt", "cancel"],
            ControlCommand::Scene => &["scene", "describe", "surroundings"],
            ControlCommand::Read => &["read", "text", "scan"],
            ControlCommand::Object => &["object", "identify", "what is this"],
            ControlCommand::Navigate => &["navigate", "navigation", "walk"],
            ControlCommand::Color => &["color", "colours"],
            ControlCommand::Chat => &["chat", "question", "ask"],
            ControlCommand::Help => &["help", "commands"],
        }
    }

    /// The mode this command switches to, for mode-name commands
    pub fn mode(&self) -> Option<AppMode> {
        match self {
            ControlCommand::Scene => Some(AppMode::Scene),
            ControlCommand::Read => Some(AppMode::Read),
            ControlCommand::Object => Some(AppMode::Object),
            ControlCommand::Navigate => Some(AppMode::Navigate),
            ControlCommand::Color => Some(AppMode::Color),
            ControlCommand::Chat => Some(AppMode::Chat),
            ControlCommand::Start | ControlCommand::Stop | ControlCommand::Help => None,
        }
    }
}

/// A classified voice transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    Control(ControlCommand),
    /// "ask ..." from any mode; carries the question
    Ask(String),
    /// Unmatched speech while in chat mode; carries the whole transcript
    Chat(String),
}
