//! Parsing of line-oriented user commands

use thiserror::Error;

use crate::state::{parse_duration, Command, EndSound, SettingChange, SettingsError};

/// Errors for a command line that cannot be turned into a `Command`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try: toggle, play, pause, reset, next, focus, break, auto, volume, sound, status, quit)")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for '{command}': {reason}")]
    InvalidArgument { command: &'static str, reason: String },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match word.to_lowercase().as_str() {
        "toggle" | "t" => Command::Toggle,
        "play" | "start" | "p" => Command::Play,
        "pause" => Command::Pause,
        "reset" | "r" => Command::Reset,
        "next" | "start-next" => Command::StartNext,
        "status" | "s" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        "focus" => {
            let d = parse_duration(required(arg, "focus")?)?;
            Command::Update(SettingChange::FocusDuration(d))
        }
        "break" => {
            let d = parse_duration(required(arg, "break")?)?;
            Command::Update(SettingChange::BreakDuration(d))
        }
        "auto" => Command::Update(SettingChange::ContinueAutomatically(parse_switch(
            required(arg, "auto")?,
        )?)),
        "volume" | "vol" => {
            let raw = required(arg, "volume")?;
            let volume: f32 = raw.parse().map_err(|_| InputError::InvalidArgument {
                command: "volume",
                reason: format!("'{}' is not a number", raw),
            })?;
            Command::Update(SettingChange::Volume(volume))
        }
        "sound" => {
            let sound: EndSound = required(arg, "sound")?.parse()?;
            Command::Update(SettingChange::EndSound(sound))
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(arg: Option<&'a str>, command: &'static str) -> Result<&'a str, InputError> {
    arg.ok_or(InputError::MissingArgument(command))
}

fn parse_switch(value: &str) -> Result<bool, InputError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(InputError::InvalidArgument {
            command: "auto",
            reason: format!("expected on or off, got '{}'", value),
        }),
    }
}
