//! External collaborator module
//!
//! This module contains the audio player and desktop notifications that the
//! session timer drives as fire-and-forget side effects.

pub mod audio;
pub mod effects;
pub mod notifications;

// Re-export main types
pub use audio::{check_player_available, AudioPlayer, PlayerKind};
pub use effects::SystemEffects;
pub use notifications::Notifier;
