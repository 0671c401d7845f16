// SPDX-License-Identifier: GPL-3.0-only

//! Transient notification channel
//!
//! Holds a single message. Showing a new message replaces the current one
//! and restarts the expiry; the front-end calls [`Notifier::expire`] on every
//! tick to clear it once [`NOTICE_DURATION`] has passed.

use crate::constants::NOTICE_DURATION;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug)]
pub struct Notifier {
    current: Option<Notice>,
    duration: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTICE_DURATION)
    }
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.show(text.into(), NoticeKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(text.into(), NoticeKind::Error);
    }

    fn show(&mut self, text: String, kind: NoticeKind) {
        match kind {
            NoticeKind::Info => debug!(text = %text, "Notice"),
            NoticeKind::Error => warn!(text = %text, "Error notice"),
        }
        self.current = Some(Notice {
            text,
            kind,
            expires_at: Instant::now() + self.duration,
        });
    }

    /// Clear the message if its time is up; true if something was cleared
    pub fn expire(&mut self, now: Instant) -> bool {
        if self
            .current
            .as_ref()
            .is_some_and(|notice| now >= notice.expires_at)
        {
            self.current = None;
            return true;
        }
        false
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_clears_after_duration() {
        let mut notifier = Notifier::default();
        notifier.info("Background captured!");
        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(!notifier.expire(Instant::now()));
        assert_eq!(notifier.text(), Some("Background captured!"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(notifier.expire(Instant::now()));
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_restarts_timer() {
        let mut notifier = Notifier::default();
        notifier.info("first");
        tokio::time::advance(Duration::from_millis(2500)).await;
        notifier.error("second");
        tokio::time::advance(Duration::from_millis(2500)).await;

        assert!(!notifier.expire(Instant::now()));
        let notice = notifier.current().unwrap();
        assert_eq!(notice.text, "second");
        assert!(notice.is_error());

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(notifier.expire(Instant::now()));
    }
}
