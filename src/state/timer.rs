//! Session timer state machine
//!
//! `SessionTimer` owns the countdown and the phase transition logic. It is
//! driven by a once-per-second tick source and signals side effects (ambient
//! sound, chime, notifications) through the [`Effects`] trait. Every public
//! operation publishes a fresh [`SessionSnapshot`] on a watch channel.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    Command, EndSound, Phase, Session, SessionSnapshot, SettingChange, Settings, SettingsError,
};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// A cancellable recurring one-second callback
pub trait TickSource {
    /// Arm the source; the first tick arrives one period later
    fn start(&mut self);
    /// Disarm the source; no tick may be delivered after this returns
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// How the ambient loop should stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Immediate,
    Fade,
}

/// Content of an end-of-phase notification
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseNotice {
    pub ended: Phase,
    pub next: Phase,
    pub next_duration: Duration,
    /// Whether the next phase will start without user action
    pub continues: bool,
}

/// Fire-and-forget side effects requested by the timer
///
/// Implementations must not block and must swallow their own failures.
pub trait Effects {
    fn start_ambient(&mut self, volume: f32);
    fn stop_ambient(&mut self, mode: StopMode);
    fn play_chime(&mut self, sound: EndSound, volume: f32);
    fn schedule_notification(&mut self, notice: PhaseNotice, delay: Duration);
    /// Drop a notification that has been scheduled but not yet posted
    fn cancel_notification(&mut self);
}

/// The single session of the process
pub struct SessionTimer<T, E> {
    session: Session,
    settings: Settings,
    ticker: T,
    effects: E,
    updates: watch::Sender<SessionSnapshot>,
}

impl<T: TickSource, E: Effects> SessionTimer<T, E> {
    /// Create an idle Focus session with the given settings
    pub fn new(settings: Settings, ticker: T, effects: E) -> Self {
        let session = Session::new(settings.focus_duration);
        let (updates, _) = watch::channel(SessionSnapshot::new(&session, &settings));

        Self {
            session,
            settings,
            ticker,
            effects,
            updates,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.session, &self.settings)
    }

    /// Subscribe to snapshots published after every change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Start or resume the countdown. No-op while running.
    pub fn play(&mut self) {
        self.start();
        self.publish();
    }

    /// Stop the countdown and the ambient sound
    pub fn pause(&mut self) {
        self.interrupt();
        self.publish();
    }

    /// The single-click interaction
    pub fn toggle(&mut self) {
        if self.session.running {
            self.interrupt();
        } else {
            self.start();
        }
        self.publish();
    }

    /// Pause and re-arm the countdown. A full reset also returns to Focus.
    pub fn reset(&mut self, time_only: bool) {
        self.effects.cancel_notification();
        self.rearm(time_only);
        self.publish();
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) {
        if !self.session.running {
            debug!("Ignoring tick while paused");
            return;
        }

        if self.session.seconds_left.is_zero() {
            self.finish_phase();
            self.publish();
            return;
        }

        self.session.seconds_left = self.session.seconds_left.saturating_sub(ONE_SECOND);

        if self.session.seconds_left == ONE_SECOND {
            self.schedule_notice();
        }

        if self.session.seconds_left.is_zero() {
            self.finish_phase();
        }

        self.publish();
    }

    /// Complete the current phase and move to the next one
    pub fn end_phase(&mut self) {
        self.finish_phase();
        self.publish();
    }

    /// "Start Next" action; ignored once the phase has been started
    pub fn resume_from_notification(&mut self) {
        if self.session.has_started {
            debug!("Start Next ignored, {} phase already started", self.session.phase);
            return;
        }
        self.play();
    }

    /// Validate and apply a settings change. Duration changes re-arm the countdown.
    pub fn apply(&mut self, change: SettingChange) -> Result<(), SettingsError> {
        let rearm = matches!(
            change,
            SettingChange::FocusDuration(_) | SettingChange::BreakDuration(_)
        );

        self.settings.apply(change)?;
        if rearm {
            self.effects.cancel_notification();
            self.rearm(true);
        }

        self.publish();
        Ok(())
    }

    /// Stop everything without fading, used when the process exits
    pub fn shutdown(&mut self) {
        self.ticker.cancel();
        self.session.running = false;
        self.effects.cancel_notification();
        self.effects.stop_ambient(StopMode::Immediate);
        self.publish();
    }

    /// Dispatch a command from the presentation layer
    pub fn handle(&mut self, command: Command) {
        debug!("Handling command: {}", command.name());

        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Toggle => self.toggle(),
            Command::Reset => self.reset(false),
            Command::StartNext => self.resume_from_notification(),
            Command::Update(change) => {
                if let Err(e) = self.apply(change) {
                    warn!("Rejected settings change: {}", e);
                }
            }
            Command::Status => self.publish(),
            Command::Quit => {}
        }
    }

    fn start(&mut self) {
        if self.session.running {
            return;
        }

        if !self.ticker.is_active() {
            self.ticker.start();
        }
        self.session.running = true;
        self.session.has_started = true;
        debug!(
            "{} running, {}s left",
            self.session.phase,
            self.session.seconds_left.as_secs()
        );

        if self.session.phase == Phase::Focus {
            self.effects.start_ambient(self.settings.volume);
        }

        // The next tick ends the phase, so no decrement will land on one second
        let left = self.session.seconds_left;
        if !left.is_zero() && left <= ONE_SECOND {
            self.schedule_notice();
        }
    }

    /// A user-initiated stop also drops the end-of-phase notification
    fn interrupt(&mut self) {
        self.effects.cancel_notification();
        self.stop();
    }

    fn stop(&mut self) {
        self.ticker.cancel();
        self.session.running = false;
        self.effects.stop_ambient(StopMode::Fade);
    }

    fn rearm(&mut self, time_only: bool) {
        if !time_only {
            self.session.phase = Phase::Focus;
        }
        self.stop();

        self.session.seconds_left = self.settings.duration_for(self.session.phase);
        self.session.has_started = false;
    }

    fn schedule_notice(&mut self) {
        let next = self.session.phase.next();
        let notice = PhaseNotice {
            ended: self.session.phase,
            next,
            next_duration: self.settings.duration_for(next),
            continues: self.settings.continue_automatically,
        };
        self.effects.schedule_notification(notice, ONE_SECOND);
    }

    fn finish_phase(&mut self) {
        let ended = self.session.phase;
        info!("{} phase complete", ended);

        self.effects.stop_ambient(StopMode::Fade);
        if ended == Phase::Focus && self.settings.end_sound != EndSound::None {
            self.effects
                .play_chime(self.settings.end_sound, self.settings.volume);
        }

        self.session.phase = ended.next();
        self.rearm(true);

        if self.settings.continue_automatically {
            info!("Continuing automatically into {} phase", self.session.phase);
            self.start();
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}
