//! Advisory completion notification.
//!
//! Notifications are a side effect nobody waits on: the child is spawned with
//! null stdio and dropped, and any failure is discarded.

use std::process::{Command, Stdio};

use tracing::debug;

pub const NOTIFY_MESSAGE: &str = "Ralph: PRD Complete!";

pub trait Notifier {
    /// Fire a notification. Must not block on or report the outcome.
    fn notify(&self, message: &str);
}

/// Notifier that runs `tt notify <message>` if `tt` is installed.
pub struct TtNotifier;

impl Notifier for TtNotifier {
    fn notify(&self, message: &str) {
        let spawned = Command::new("tt")
            .arg("notify")
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        // Detached: the child handle is dropped without waiting.
        match spawned {
            Ok(child) => debug!(pid = child.id(), "notification spawned"),
            Err(err) => debug!(err = %err, "notification unavailable"),
        }
    }
}
