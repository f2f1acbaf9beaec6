//! User-configurable session settings and their validation

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::Phase;

/// Default Focus length
pub const DEFAULT_FOCUS: Duration = Duration::from_secs(25 * 60);
/// Default Break length
pub const DEFAULT_BREAK: Duration = Duration::from_secs(5 * 60);
/// Default playback volume
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Errors raised when a setting is rejected at the settings boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{0} duration must be greater than zero")]
    ZeroDuration(Phase),

    #[error("invalid duration '{0}' (expected e.g. 25, 25m, 90s or 1h30m)")]
    InvalidDuration(String),

    #[error("volume must be a number between 0 and 1")]
    InvalidVolume,

    #[error("unknown sound '{0}'")]
    UnknownSound(String),
}

/// Chime played when a Focus phase ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EndSound {
    None,
    Basso,
    Blow,
    Bottle,
    Frog,
    Funk,
    #[default]
    Glass,
    Hero,
    Morse,
    Ping,
    Pop,
    Purr,
    Sosumi,
    Submarine,
    Tink,
}

impl EndSound {
    /// Display name, matching the system sound file name on macOS
    pub fn name(&self) -> &'static str {
        match self {
            EndSound::None => "None",
            EndSound::Basso => "Basso",
            EndSound::Blow => "Blow",
            EndSound::Bottle => "Bottle",
            EndSound::Frog => "Frog",
            EndSound::Funk => "Funk",
            EndSound::Glass => "Glass",
            EndSound::Hero => "Hero",
            EndSound::Morse => "Morse",
            EndSound::Ping => "Ping",
            EndSound::Pop => "Pop",
            EndSound::Purr => "Purr",
            EndSound::Sosumi => "Sosumi",
            EndSound::Submarine => "Submarine",
            EndSound::Tink => "Tink",
        }
    }

    /// Location of the sound file on this platform, `None` for the silent option
    pub fn path(&self) -> Option<PathBuf> {
        if *self == EndSound::None {
            return None;
        }

        if cfg!(target_os = "macos") {
            return Some(PathBuf::from(format!("/System/Library/Sounds/{}.aiff", self.name())));
        }

        // The freedesktop theme has no per-name equivalents, so sounds are grouped
        let file = match self {
            EndSound::Basso | EndSound::Funk | EndSound::Sosumi => "dialog-warning.oga",
            EndSound::Blow | EndSound::Purr | EndSound::Submarine => "bell.oga",
            EndSound::Ping | EndSound::Pop | EndSound::Tink => "message.oga",
            _ => "complete.oga",
        };
        Some(PathBuf::from("/usr/share/sounds/freedesktop/stereo").join(file))
    }
}

impl fmt::Display for EndSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EndSound {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndSound::value_variants()
            .iter()
            .copied()
            .find(|sound| sound.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownSound(s.trim().to_string()))
    }
}

/// A single change requested from the settings surface
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    FocusDuration(Duration),
    BreakDuration(Duration),
    ContinueAutomatically(bool),
    Volume(f32),
    EndSound(EndSound),
}

/// Validated settings consumed by the session timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(with = "duration_secs")]
    pub focus_duration: Duration,
    #[serde(with = "duration_secs")]
    pub break_duration: Duration,
    pub continue_automatically: bool,
    pub volume: f32,
    pub end_sound: EndSound,
}

impl Settings {
    /// Build settings, rejecting zero durations and clamping the volume
    pub fn new(
        focus_duration: Duration,
        break_duration: Duration,
        continue_automatically: bool,
        volume: f32,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            focus_duration: validate_duration(Phase::Focus, focus_duration)?,
            break_duration: validate_duration(Phase::Break, break_duration)?,
            continue_automatically,
            volume: validate_volume(volume)?,
            end_sound: EndSound::default(),
        })
    }

    pub fn with_end_sound(mut self, end_sound: EndSound) -> Self {
        self.end_sound = end_sound;
        self
    }

    /// Configured length of the given phase
    pub fn duration_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Focus => self.focus_duration,
            Phase::Break => self.break_duration,
        }
    }

    /// Validate and apply a change. Nothing is modified on error.
    pub fn apply(&mut self, change: SettingChange) -> Result<(), SettingsError> {
        match change {
            SettingChange::FocusDuration(d) => {
                self.focus_duration = validate_duration(Phase::Focus, d)?;
            }
            SettingChange::BreakDuration(d) => {
                self.break_duration = validate_duration(Phase::Break, d)?;
            }
            SettingChange::ContinueAutomatically(enabled) => self.continue_automatically = enabled,
            SettingChange::Volume(v) => self.volume = validate_volume(v)?,
            SettingChange::EndSound(sound) => self.end_sound = sound,
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: DEFAULT_FOCUS,
            break_duration: DEFAULT_BREAK,
            continue_automatically: true,
            volume: DEFAULT_VOLUME,
            end_sound: EndSound::default(),
        }
    }
}

fn validate_duration(phase: Phase, duration: Duration) -> Result<Duration, SettingsError> {
    if duration.is_zero() {
        return Err(SettingsError::ZeroDuration(phase));
    }
    Ok(duration)
}

fn validate_volume(volume: f32) -> Result<f32, SettingsError> {
    if volume.is_nan() {
        return Err(SettingsError::InvalidVolume);
    }
    let clamped = volume.clamp(0.0, 1.0);
    if clamped != volume {
        warn!("Volume {} out of range, clamped to {}", volume, clamped);
    }
    Ok(clamped)
}

/// Parse a duration like "25", "25m", "90s" or "1h30m". Bare numbers are minutes.
pub fn parse_duration(input: &str) -> Result<Duration, SettingsError> {
    let s = input.trim().to_lowercase();
    let invalid = || SettingsError::InvalidDuration(input.trim().to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    if let Ok(minutes) = s.parse::<u64>() {
        return minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(invalid);
    }

    let mut total: u64 = 0;
    let mut current = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }

        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid()),
        };
        total = add_component(total, &current, unit).ok_or_else(invalid)?;
        current.clear();
    }

    // Trailing number without a unit counts as minutes
    if !current.is_empty() {
        total = add_component(total, &current, 60).ok_or_else(invalid)?;
    }

    Ok(Duration::from_secs(total))
}

/// `total + digits * unit`, or `None` on a malformed number or overflow
fn add_component(total: u64, digits: &str, unit: u64) -> Option<u64> {
    let value: u64 = digits.parse().ok()?;
    value.checked_mul(unit)?.checked_add(total)
}

/// Serialize durations as (possibly fractional) seconds
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
