//! Session task: the single owner of the session timer

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::{Command, Effects, SessionTimer};

use super::ticker::IntervalTicker;

/// Drive the session timer from commands and its tick source until a quit
/// command arrives, the command channel closes, or `shutdown` resolves.
///
/// Commands and ticks are processed one at a time on this task. The pending
/// tick future is dropped before a command is handled, so a pause can never be
/// followed by a stale tick.
pub async fn session_task<E, F>(
    mut timer: SessionTimer<IntervalTicker, E>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    shutdown: F,
) where
    E: Effects,
    F: Future<Output = ()>,
{
    info!("Starting session task");
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(Command::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(command) => timer.handle(command),
                    None => {
                        debug!("Command channel closed");
                        break;
                    }
                }
            }

            _ = timer.ticker_mut().tick() => {
                timer.tick();
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    timer.shutdown();
    info!("Session task stopped");
}
