//! Desktop notifications for phase transitions

use std::time::Duration;

use chrono::{DateTime, Local};
use notify_rust::Notification;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::{
    control::render::format_remaining,
    state::{Command, Phase, PhaseNotice},
};

const APP_NAME: &str = "cherry";
const START_NEXT_ACTION: &str = "start-next";

/// Posts end-of-phase notifications and relays their "Start Next" action
#[derive(Debug)]
pub struct Notifier {
    enabled: bool,
    commands: mpsc::UnboundedSender<Command>,
    pending: Option<JoinHandle<()>>,
}

impl Notifier {
    pub fn new(enabled: bool, commands: mpsc::UnboundedSender<Command>) -> Self {
        Self {
            enabled,
            commands,
            pending: None,
        }
    }

    /// Whether a scheduled notification is still waiting to be posted
    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// Post a notification for `notice` after `delay`, replacing any pending one
    pub fn schedule(&mut self, notice: PhaseNotice, delay: Duration) {
        if !self.enabled {
            return;
        }
        self.cancel();

        let commands = self.commands.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;

            let (summary, body) = notification_text(&notice, Local::now());
            let offer_start = !notice.continues;
            let delivered = tokio::task::spawn_blocking(move || {
                deliver(&summary, &body, offer_start, commands)
            })
            .await;

            match delivered {
                Ok(Ok(())) => debug!("Notification for end of {} delivered", notice.ended),
                Ok(Err(e)) => warn!("{}", e),
                Err(e) => warn!("Notification task failed: {}", e),
            }
        }));
    }

    /// Withdraw the pending notification. One already on screen stays there.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                debug!("Cancelling pending notification");
                pending.abort();
            }
        }
    }
}

/// Summary and body for a phase that ends at `now`
pub fn notification_text(notice: &PhaseNotice, now: DateTime<Local>) -> (String, String) {
    let summary = match notice.ended {
        Phase::Focus => "Focus session complete".to_string(),
        Phase::Break => "Break is over".to_string(),
    };

    let length = format_remaining(notice.next_duration);
    let next = notice.next.as_str();

    let body = if notice.continues {
        let ends_at = chrono::Duration::from_std(notice.next_duration)
            .map(|d| now + d)
            .unwrap_or(now);
        format!("{} {} started, ends at {}.", length, next, ends_at.format("%H:%M"))
    } else {
        format!("Start the {} {} when you're ready.", length, next)
    };

    (summary, body)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn deliver(
    summary: &str,
    body: &str,
    offer_start: bool,
    commands: mpsc::UnboundedSender<Command>,
) -> Result<(), String> {
    let mut notification = Notification::new();
    notification.summary(summary).body(body).appname(APP_NAME);
    if offer_start {
        notification.action(START_NEXT_ACTION, "Start Next");
    }

    let handle = notification
        .show()
        .map_err(|e| format!("Failed to show notification: {}", e))?;

    if offer_start {
        // Blocks this worker thread until the notification is dismissed
        handle.wait_for_action(|action| {
            if action == START_NEXT_ACTION {
                tracing::info!("Start Next chosen from notification");
                if commands.send(Command::StartNext).is_err() {
                    debug!("Session task gone, dropping Start Next");
                }
            }
        });
    }

    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn deliver(
    summary: &str,
    body: &str,
    _offer_start: bool,
    _commands: mpsc::UnboundedSender<Command>,
) -> Result<(), String> {
    debug!("Notification actions are not supported on this platform ({})", START_NEXT_ACTION);
    Notification::new()
        .summary(summary)
        .body(body)
        .appname(APP_NAME)
        .show()
        .map(|_| ())
        .map_err(|e| format!("Failed to show notification: {}", e))
}
