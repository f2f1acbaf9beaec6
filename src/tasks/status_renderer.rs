//! Status renderer task

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::watch,
};
use tracing::{debug, info, warn};

use crate::{
    control::{render_line, RenderOptions},
    state::SessionSnapshot,
};

/// Print a status line for the current snapshot and for every change after it
pub async fn status_renderer_task<W>(
    mut updates: watch::Receiver<SessionSnapshot>,
    options: RenderOptions,
    mut out: W,
) where
    W: AsyncWrite + Unpin,
{
    info!("Starting status renderer task");
    let mut last_line = String::new();

    loop {
        let line = render_line(&updates.borrow_and_update(), &options);

        // Settings-only changes can render identically
        if line != last_line {
            if let Err(e) = write_line(&mut out, &line).await {
                warn!("Failed to write status line: {}", e);
            }
            last_line = line;
        }

        if updates.changed().await.is_err() {
            debug!("Session closed, stopping status renderer");
            break;
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::{Session, Settings};

    #[tokio::test]
    async fn test_renders_changes_until_sender_dropped() {
        let settings = Settings::default();
        let mut session = Session::new(Duration::from_secs(65));
        let (tx, rx) = watch::channel(SessionSnapshot::new(&session, &settings));

        let handle = tokio::spawn(async move {
            let mut out = Vec::new();
            status_renderer_task(rx, RenderOptions::default(), &mut out).await;
            out
        });

        tokio::task::yield_now().await;
        session.running = true;
        session.has_started = true;
        session.seconds_left = Duration::from_secs(64);
        tx.send_replace(SessionSnapshot::new(&session, &settings));
        tokio::task::yield_now().await;
        drop(tx);

        let out = String::from_utf8(handle.await.unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.first(), Some(&"⏸ 1:05  Focus idle"));
        assert!(lines.last().unwrap().ends_with("1:04  Focus running"));
    }
}
