//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    control::{Glyphs, OutputFormat, RenderOptions},
    state::{parse_duration, EndSound, Settings, SettingsError},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "cherry")]
#[command(about = "A focus/break session timer with ambient sound and notifications")]
#[command(version)]
pub struct Config {
    /// Focus length, e.g. 25, 25m, 90s or 1h30m (bare numbers are minutes)
    #[arg(short, long, default_value = "25m", value_parser = parse_duration)]
    pub focus: Duration,

    /// Break length
    #[arg(short = 'b', long = "break", default_value = "5m", value_parser = parse_duration)]
    pub break_length: Duration,

    /// Wait for "next" instead of starting the following phase automatically
    #[arg(short, long)]
    pub manual: bool,

    /// Playback volume between 0 and 1
    #[arg(long, default_value = "0.5")]
    pub volume: f32,

    /// Chime played when a focus session ends
    #[arg(long, value_enum, default_value = "glass")]
    pub end_sound: EndSound,

    /// Track looped during focus sessions
    #[arg(long)]
    pub ambient: Option<PathBuf>,

    /// Status line format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Glyph shown while paused
    #[arg(long, default_value = "⏸")]
    pub pause_glyph: String,

    /// Glyph shown while focusing
    #[arg(long, default_value = "🏃🏻‍♂️")]
    pub run_glyph: String,

    /// Glyph shown during a break
    #[arg(long, default_value = "❄️")]
    pub break_glyph: String,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notifications: bool,

    /// Start the first focus session immediately
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validated session settings
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        Settings::new(self.focus, self.break_length, !self.manual, self.volume)
            .map(|settings| settings.with_end_sound(self.end_sound))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.format,
            glyphs: Glyphs {
                pause: self.pause_glyph.clone(),
                run: self.run_glyph.clone(),
                cooldown: self.break_glyph.clone(),
            },
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
