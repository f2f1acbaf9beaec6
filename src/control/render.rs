//! Status line rendering from session snapshots

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::state::{Phase, SessionSnapshot, SessionStatus};

/// Output format of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per change
    #[default]
    Text,
    /// One JSON object per change
    Json,
}

/// Glyphs shown in front of the remaining time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub pause: String,
    pub run: String,
    pub cooldown: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            pause: "⏸".to_string(),
            run: "🏃🏻‍♂️".to_string(),
            cooldown: "❄️".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub glyphs: Glyphs,
}

/// Everything a status-bar front end needs to draw the session
#[derive(Debug, Clone, Serialize)]
pub struct StatusLine<'a> {
    pub glyph: &'a str,
    pub icon: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub snapshot: &'a SessionSnapshot,
}

impl<'a> StatusLine<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, glyphs: &'a Glyphs) -> Self {
        Self {
            glyph: glyph(snapshot, glyphs),
            icon: icon_name(snapshot),
            title: format_remaining(snapshot.session.seconds_left),
            snapshot,
        }
    }
}

/// Pause glyph unless running, then the run or cooldown glyph by phase
pub fn glyph<'a>(snapshot: &SessionSnapshot, glyphs: &'a Glyphs) -> &'a str {
    if !snapshot.session.running {
        return &glyphs.pause;
    }

    match snapshot.session.phase {
        Phase::Focus => &glyphs.run,
        Phase::Break => &glyphs.cooldown,
    }
}

/// SF Symbols name matching the session status
pub fn icon_name(snapshot: &SessionSnapshot) -> &'static str {
    match snapshot.session.status() {
        SessionStatus::RunningFocus => "pause.circle",
        SessionStatus::RunningBreak => "powersleep",
        SessionStatus::Idle | SessionStatus::Paused => "play.circle",
    }
}

/// Format remaining time as M:SS, minutes unbounded
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render one output line for the snapshot
pub fn render_line(snapshot: &SessionSnapshot, options: &RenderOptions) -> String {
    let line = StatusLine::new(snapshot, &options.glyphs);

    match options.format {
        OutputFormat::Text => {
            let state = match snapshot.status {
                SessionStatus::Idle => "idle",
                SessionStatus::RunningFocus | SessionStatus::RunningBreak => "running",
                SessionStatus::Paused => "paused",
            };
            format!("{} {}  {} {}", line.glyph, line.title, snapshot.session.phase, state)
        }
        OutputFormat::Json => serde_json::to_string(&line).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize status line: {}", e);
            String::from("{}")
        }),
    }
}
