//! Transient user feedback.
//!
//! A single notification is visible at a time: showing a new one replaces
//! the current one and restarts the auto-dismiss timer. Dismissal is
//! generation-guarded, so a stale timer firing after a replacement is a
//! no-op rather than cutting the newer notification short.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// How long a notification stays on screen.
pub const DISMISS_AFTER: Duration = Duration::from_millis(5000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    /// Degraded success: the submission went through with reduced data.
    Warning,
    Error,
}

impl NotificationKind {
    fn glyph(self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✗",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Capability the orchestrator reports through.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

#[derive(Default)]
struct PresenterState {
    current: Option<Notification>,
    generation: u64,
}

/// Single-instance notification presenter with auto-dismiss.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    state: Arc<Mutex<PresenterState>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.state.lock().unwrap().current.clone()
    }

    fn show(&self, notification: Notification) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            eprintln!("{} {}", notification.kind.glyph(), notification.message);
            state.current = Some(notification);
            state.generation
        };

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            sleep(DISMISS_AFTER).await;
            let mut state = state.lock().unwrap();
            if state.generation == generation {
                state.current = None;
            }
        });
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.show(Notification {
            kind,
            message: message.to_string(),
        });
    }
}
