//! Transient notices (toasts) shown over the current screen.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}

/// Bounded queue of notices, each living for `ttl` after it was pushed.
pub struct NoticeQueue {
    ttl: Duration,
    items: VecDeque<(Notice, Instant)>,
}

impl NoticeQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notice: Notice, now: Instant) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(text = %notice.text, "notice"),
            _ => tracing::info!(text = %notice.text, "notice"),
        }
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back((notice, now));
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// Drop every notice older than the ttl.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|(_, pushed)| now.saturating_duration_since(*pushed) < ttl);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().map(|(notice, _)| notice)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
