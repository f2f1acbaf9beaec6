//! Stdin command reader task

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};
use tracing::{debug, error, info, warn};

use crate::{control::parse_command, state::Command};

/// Read one command per line and forward it to the session task.
///
/// End of input is treated as a quit request.
pub async fn input_reader_task<R>(reader: R, commands: mpsc::UnboundedSender<Command>)
where
    R: AsyncBufRead + Unpin,
{
    info!("Starting input reader task");
    let mut lines = reader.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Some(command)) => {
                    debug!("Parsed command: {:?}", command);
                    let quit = command == Command::Quit;
                    if commands.send(command).is_err() {
                        debug!("Session task gone, stopping input reader");
                        return;
                    }
                    if quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            },
            Ok(None) => {
                info!("Input closed");
                break;
            }
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = commands.send(Command::Quit);
}
