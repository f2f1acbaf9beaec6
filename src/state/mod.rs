//! State management module
//!
//! This module contains the session state, its settings, and the timer state
//! machine that mutates them.

pub mod command;
pub mod session;
pub mod settings;
pub mod timer;

// Re-export main types
pub use command::Command;
pub use session::{Phase, Session, SessionSnapshot, SessionStatus};
pub use settings::{parse_duration, EndSound, SettingChange, Settings, SettingsError};
pub use timer::{Effects, PhaseNotice, SessionTimer, StopMode, TickSource};
