//! Cherry - A focus/break session timer
//!
//! This library provides a single focus/break session driven by a one-second
//! tick, with ambient sound during focus, a chime and desktop notification at
//! phase transitions, and a status line for terminals or status-bar tools.

pub mod config;
pub mod control;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{Command, SessionTimer, Settings};
pub use tasks::session_task;
pub use utils::signals::shutdown_signal;
