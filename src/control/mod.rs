//! Presentation module
//!
//! This module turns user input into session commands and session snapshots
//! into status lines for a terminal or a status-bar tool.

pub mod input;
pub mod render;

// Re-export main functions
pub use input::{parse_command, InputError};
pub use render::{render_line, Glyphs, OutputFormat, RenderOptions};
