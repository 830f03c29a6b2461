//! Transient upload notifications

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long a notification stays visible unless configured otherwise
pub const DEFAULT_NOTIFICATION_WINDOW: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
}

/// A single-slot banner: a new notification replaces the current one and
/// restarts the window.
#[derive(Debug)]
pub struct NotificationBanner {
    window: Duration,
    current: Option<Notification>,
}

impl Default for NotificationBanner {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_WINDOW)
    }
}

impl NotificationBanner {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            current: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.current = Some(Notification {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    /// The notification, if one is still inside its window at `now`
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.shown_at) < self.window)
    }

    /// Drop an expired notification. Returns `true` if one was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.current(now).is_none() {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_within_window_only() {
        let start = Instant::now();
        let mut banner = NotificationBanner::default();
        banner.show(NotificationKind::Success, "a.pdf uploaded successfully!", start);

        let shown = banner.current(start + Duration::from_millis(1999)).unwrap();
        assert_eq!(shown.kind, NotificationKind::Success);
        assert!(banner.current(start + Duration::from_millis(2000)).is_none());
    }

    #[test]
    fn test_last_write_wins_and_restarts_window() {
        let start = Instant::now();
        let mut banner = NotificationBanner::default();
        banner.show(NotificationKind::Success, "a.pdf uploaded successfully!", start);
        let later = start + Duration::from_millis(1500);
        banner.show(NotificationKind::Error, "Unsupported file: b.txt", later);

        let shown = banner.current(start + Duration::from_millis(2500)).unwrap();
        assert_eq!(shown.message, "Unsupported file: b.txt");
        assert_eq!(shown.kind, NotificationKind::Error);
    }

    #[test]
    fn test_tick_clears_expired() {
        let start = Instant::now();
        let mut banner = NotificationBanner::new(Duration::from_millis(100));
        banner.show(NotificationKind::Error, "Failed to parse x.pdf", start);
        assert!(!banner.tick(start + Duration::from_millis(50)));
        assert!(banner.tick(start + Duration::from_millis(100)));
        assert!(!banner.tick(start + Duration::from_millis(150)));
        assert!(banner.current(start).is_none());
    }
}
