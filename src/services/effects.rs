//! Production side effects for the session timer

use std::time::Duration;

use crate::state::{Effects, EndSound, PhaseNotice, StopMode};

use super::{audio::AudioPlayer, notifications::Notifier};

/// Routes timer side effects to the audio player and the notifier
pub struct SystemEffects {
    audio: AudioPlayer,
    notifier: Notifier,
}

impl SystemEffects {
    pub fn new(audio: AudioPlayer, notifier: Notifier) -> Self {
        Self { audio, notifier }
    }
}

impl Effects for SystemEffects {
    fn start_ambient(&mut self, volume: f32) {
        self.audio.start_ambient(volume);
    }

    fn stop_ambient(&mut self, mode: StopMode) {
        self.audio.stop_ambient(mode);
    }

    fn play_chime(&mut self, sound: EndSound, volume: f32) {
        self.audio.play_chime(sound, volume);
    }

    fn schedule_notification(&mut self, notice: PhaseNotice, delay: Duration) {
        self.notifier.schedule(notice, delay);
    }

    fn cancel_notification(&mut self) {
        self.notifier.cancel();
    }
}
