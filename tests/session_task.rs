use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::sleep,
};

use cherry::{
    session_task,
    state::{
        Command, Effects, EndSound, Phase, PhaseNotice, Session, SessionSnapshot, SettingChange,
        SessionTimer, Settings, StopMode,
    },
    tasks::IntervalTicker,
};

#[derive(Debug, Clone, PartialEq)]
enum Effect {
    StartAmbient,
    StopAmbient(StopMode),
    Chime(EndSound),
    Notify(Phase, Duration),
    CancelNotify,
}

#[derive(Debug, Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Effect>>>);

impl Recorder {
    fn events(&self) -> Vec<Effect> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, effect: Effect) {
        self.0.lock().unwrap().push(effect);
    }
}

impl Effects for Recorder {
    fn start_ambient(&mut self, _volume: f32) {
        self.push(Effect::StartAmbient);
    }

    fn stop_ambient(&mut self, mode: StopMode) {
        self.push(Effect::StopAmbient(mode));
    }

    fn play_chime(&mut self, sound: EndSound, _volume: f32) {
        self.push(Effect::Chime(sound));
    }

    fn schedule_notification(&mut self, notice: PhaseNotice, delay: Duration) {
        self.push(Effect::Notify(notice.ended, delay));
    }

    fn cancel_notification(&mut self) {
        self.push(Effect::CancelNotify);
    }
}

struct Harness {
    commands: mpsc::UnboundedSender<Command>,
    updates: watch::Receiver<SessionSnapshot>,
    recorder: Recorder,
    handle: JoinHandle<()>,
}

impl Harness {
    fn start(focus: u64, brk: u64, auto: bool) -> Self {
        let settings =
            Settings::new(Duration::from_secs(focus), Duration::from_secs(brk), auto, 0.5).unwrap();
        let recorder = Recorder::default();
        let timer = SessionTimer::new(settings, IntervalTicker::new(), recorder.clone());
        let updates = timer.subscribe();

        let (commands, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(session_task(timer, rx, std::future::pending::<()>()));

        Self {
            commands,
            updates,
            recorder,
            handle,
        }
    }

    fn send(&self, command: Command) {
        self.commands.send(command).unwrap();
    }

    fn session(&self) -> Session {
        self.updates.borrow().session.clone()
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[tokio::test(start_paused = true)]
async fn test_auto_continue_follows_the_clock() {
    let harness = Harness::start(5, 2, true);
    harness.send(Command::Play);

    sleep(Duration::from_millis(5500)).await;
    let session = harness.session();
    assert_eq!(session.phase, Phase::Break);
    assert_eq!(session.seconds_left, secs(2));
    assert!(session.running);

    sleep(secs(2)).await;
    let session = harness.session();
    assert_eq!(session.phase, Phase::Focus);
    assert_eq!(session.seconds_left, secs(5));
    assert!(session.running);

    let events = harness.recorder.events();
    assert_eq!(
        events.iter().filter(|e| matches!(e, Effect::Chime(_))).count(),
        1
    );
    assert!(events.contains(&Effect::Notify(Phase::Focus, secs(1))));
    assert!(events.contains(&Effect::Notify(Phase::Break, secs(1))));
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_the_countdown() {
    let harness = Harness::start(5, 2, true);
    harness.send(Command::Play);

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(harness.session().seconds_left, secs(3));

    harness.send(Command::Pause);
    sleep(secs(10)).await;
    let session = harness.session();
    assert_eq!(session.seconds_left, secs(3));
    assert!(!session.running);
    assert!(session.has_started);

    // Resuming waits a full second before the next tick
    harness.send(Command::Toggle);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(harness.session().seconds_left, secs(3));
    sleep(secs(1)).await;
    assert_eq!(harness.session().seconds_left, secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_pause_in_last_second_withdraws_notification() {
    let harness = Harness::start(3, 2, true);
    harness.send(Command::Play);

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(harness.session().seconds_left, secs(1));
    assert_eq!(harness.recorder.events().last(), Some(&Effect::Notify(Phase::Focus, secs(1))));

    harness.send(Command::Pause);
    sleep(secs(5)).await;
    let events = harness.recorder.events();
    let notify = events
        .iter()
        .position(|e| matches!(e, Effect::Notify(..)))
        .unwrap();
    assert_eq!(events[notify + 1], Effect::CancelNotify);
    assert_eq!(harness.session().phase, Phase::Focus);
    assert_eq!(harness.session().seconds_left, secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_manual_mode_waits_for_start_next() {
    let harness = Harness::start(2, 3, false);
    harness.send(Command::Play);

    sleep(Duration::from_millis(2500)).await;
    let session = harness.session();
    assert_eq!(session.phase, Phase::Break);
    assert_eq!(session.seconds_left, secs(3));
    assert!(!session.running);
    assert!(!session.has_started);

    sleep(secs(5)).await;
    assert_eq!(harness.session().seconds_left, secs(3));

    harness.send(Command::StartNext);
    sleep(Duration::from_millis(1500)).await;
    let session = harness.session();
    assert!(session.running);
    assert_eq!(session.seconds_left, secs(2));

    // A second Start Next after a manual pause is ignored
    harness.send(Command::Pause);
    harness.send(Command::StartNext);
    sleep(secs(3)).await;
    let session = harness.session();
    assert!(!session.running);
    assert_eq!(session.seconds_left, secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_settings_change_rearms_and_reset_returns_to_focus() {
    let harness = Harness::start(5, 2, true);
    harness.send(Command::Play);
    sleep(Duration::from_millis(5500)).await;
    assert_eq!(harness.session().phase, Phase::Break);

    harness.send(Command::Update(SettingChange::BreakDuration(secs(60))));
    sleep(Duration::from_millis(100)).await;
    let session = harness.session();
    assert_eq!(session.phase, Phase::Break);
    assert_eq!(session.seconds_left, secs(60));
    assert!(!session.running);

    // Zero durations are rejected and leave the session untouched
    harness.send(Command::Update(SettingChange::FocusDuration(Duration::ZERO)));
    harness.send(Command::Reset);
    sleep(Duration::from_millis(100)).await;
    let snapshot = harness.updates.borrow().clone();
    assert_eq!(snapshot.session.phase, Phase::Focus);
    assert_eq!(snapshot.session.seconds_left, secs(5));
    assert_eq!(snapshot.settings.focus_duration, secs(5));
    assert!(!snapshot.can_reset);
}

#[tokio::test(start_paused = true)]
async fn test_quit_stops_ambient_immediately() {
    let harness = Harness::start(25 * 60, 5 * 60, true);
    harness.send(Command::Play);
    sleep(secs(3)).await;

    harness.send(Command::Quit);
    harness.handle.await.unwrap();

    let events = harness.recorder.events();
    assert_eq!(events.first(), Some(&Effect::StartAmbient));
    assert_eq!(events.last(), Some(&Effect::StopAmbient(StopMode::Immediate)));
    assert!(!harness.updates.borrow().session.running);
}

#[tokio::test(start_paused = true)]
async fn test_closed_command_channel_ends_the_task() {
    let Harness {
        commands, handle, ..
    } = Harness::start(10, 5, true);
    commands.send(Command::Play).unwrap();
    drop(commands);

    tokio::time::timeout(secs(1), handle)
        .await
        .expect("session task should stop")
        .unwrap();
}
