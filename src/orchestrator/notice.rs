//! User-facing error notices that expire on their own.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{ChatError, ErrorCategory, RecoverySuggestion};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// A surfaced failure as the user should see it.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub message: String,
    pub category: ErrorCategory,
    pub suggestion: RecoverySuggestion,
    pub posted_at: Instant,
}

impl ErrorNotice {
    pub fn from_error(err: &ChatError) -> Self {
        Self {
            message: err.to_string(),
            category: err.category(),
            suggestion: err.recovery_suggestion(),
            posted_at: Instant::now(),
        }
    }
}

/// Holds at most one notice; a newer one replaces the older.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Mutex<Option<ErrorNotice>>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&self, err: &ChatError) -> ErrorNotice {
        let notice = ErrorNotice::from_error(err);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice.clone());
        notice
    }

    /// The live notice, or `None` once it has expired.
    pub fn current(&self) -> Option<ErrorNotice> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|notice| notice.posted_at.elapsed() >= self.ttl)
        {
            *current = None;
        }
        current.clone()
    }

    pub fn dismiss(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}
