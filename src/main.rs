//! Cherry - A focus/break session timer
//!
//! This is the main entry point for the cherry application.

use std::time::Duration;

use tokio::{io::BufReader, runtime::Runtime, sync::mpsc};
use tracing::{info, warn};

use cherry::{
    config::Config,
    services::{check_player_available, AudioPlayer, Notifier, SystemEffects},
    state::{Command, SessionTimer, Settings},
    tasks::{input_reader_task, session_task, status_renderer_task, IntervalTicker},
    utils::shutdown_signal,
};

/// Blocking reads (stdin, notification actions) are abandoned after this long
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout carries the status line
    tracing_subscriber::fmt()
        .with_env_filter(format!("cherry={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let settings = config.settings()?;

    let runtime = Runtime::new()?;
    runtime.block_on(run(config, settings));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    info!("Shutdown complete");
    Ok(())
}

async fn run(config: Config, settings: Settings) {
    info!("Starting cherry v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: focus={}s, break={}s, continue={}, volume={:.2}, sound={}",
        settings.focus_duration.as_secs(),
        settings.break_duration.as_secs(),
        settings.continue_automatically,
        settings.volume,
        settings.end_sound
    );

    // Missing audio is not fatal, the countdown works without it
    let player = match check_player_available().await {
        Ok(kind) => Some(kind),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let effects = SystemEffects::new(
        AudioPlayer::new(player, config.ambient.clone()),
        Notifier::new(!config.no_notifications, command_tx.clone()),
    );
    let timer = SessionTimer::new(settings, IntervalTicker::new(), effects);

    // Render every snapshot change
    let renderer = tokio::spawn(status_renderer_task(
        timer.subscribe(),
        config.render_options(),
        tokio::io::stdout(),
    ));

    // Forward stdin commands
    tokio::spawn(input_reader_task(
        BufReader::new(tokio::io::stdin()),
        command_tx.clone(),
    ));

    if config.autostart {
        let _ = command_tx.send(Command::Play);
    }
    info!("Commands: toggle, play, pause, reset, next, focus <dur>, break <dur>, auto on|off, volume <0-1>, sound <name>, status, quit");

    session_task(timer, command_rx, shutdown_signal()).await;

    // The renderer ends once the timer and its watch sender are dropped
    if let Err(e) = renderer.await {
        warn!("Status renderer failed: {}", e);
    }
}
