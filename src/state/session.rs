//! Session countdown state and its read-only snapshot

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::{duration_secs, Settings};

/// Which interval is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Focus => f.write_str("Focus"),
            Phase::Break => f.write_str("Break"),
        }
    }
}

/// Observable status derived from `running`, `has_started` and `phase`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Idle,
    RunningFocus,
    RunningBreak,
    Paused,
}

/// Countdown state of the single session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(with = "duration_secs")]
    pub seconds_left: Duration,
    pub phase: Phase,
    pub running: bool,
    pub has_started: bool,
}

impl Session {
    /// A freshly reset Focus session
    pub fn new(focus_duration: Duration) -> Self {
        Self {
            seconds_left: focus_duration,
            phase: Phase::Focus,
            running: false,
            has_started: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (self.running, self.phase) {
            (true, Phase::Focus) => SessionStatus::RunningFocus,
            (true, Phase::Break) => SessionStatus::RunningBreak,
            (false, _) if self.has_started => SessionStatus::Paused,
            (false, _) => SessionStatus::Idle,
        }
    }

    /// Whether a reset would change anything visible
    pub fn can_reset(&self) -> bool {
        self.has_started || self.phase == Phase::Break
    }
}

/// Immutable copy of the session and its settings, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub session: Session,
    pub status: SessionStatus,
    pub can_reset: bool,
    pub settings: Settings,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(session: &Session, settings: &Settings) -> Self {
        Self {
            session: session.clone(),
            status: session.status(),
            can_reset: session.can_reset(),
            settings: settings.clone(),
            updated_at: Utc::now(),
        }
    }
}
