//! Commands relayed into the session timer

use super::SettingChange;

/// A user or notification command for the session task
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    /// Full reset back to an idle Focus phase
    Reset,
    /// "Start Next" from an end-of-phase notification
    StartNext,
    Update(SettingChange),
    /// Re-publish the current snapshot
    Status,
    Quit,
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Toggle => "toggle",
            Command::Reset => "reset",
            Command::StartNext => "start-next",
            Command::Update(_) => "update",
            Command::Status => "status",
            Command::Quit => "quit",
        }
    }
}
