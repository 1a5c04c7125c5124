//! Transient toast notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Toasts shown at once; older ones are dropped first
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    created: Instant,
}

impl Notification {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= NOTIFICATION_TTL
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
}

impl Notifications {
    pub fn success(&mut self, title: &str, description: impl Into<String>) {
        self.push(NotificationKind::Success, title, description.into());
    }

    pub fn error(&mut self, title: &str, description: impl Into<String>) {
        self.push(NotificationKind::Error, title, description.into());
    }

    fn push(&mut self, kind: NotificationKind, title: &str, description: String) {
        if self.items.len() == MAX_VISIBLE {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            kind,
            title: title.to_string(),
            description,
            created: Instant::now(),
        });
    }

    /// Drop expired toasts
    pub fn prune(&mut self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
