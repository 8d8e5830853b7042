//! User-facing notices and the bounded operations log.
//!
//! Every operation that talks to the backend reports its outcome as a
//! [`Notice`]. Callers decide how to render them; the SDK only records them
//! and mirrors each one to `tracing`.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{NOTICE_DURATION, OPERATION_LOG_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// A transient message with a severity and an auto-dismiss duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub duration: Duration,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            created_at: Utc::now(),
            duration: NOTICE_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the notice should have been dismissed by `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.duration) {
            Ok(d) => now >= self.created_at + d,
            Err(_) => false,
        }
    }
}

/// Bounded in-memory log of notices, oldest dropped first.
#[derive(Debug, Clone)]
pub struct OperationLog {
    entries: VecDeque<Notice>,
    capacity: usize,
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::with_capacity(OPERATION_LOG_CAPACITY)
    }
}

impl OperationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a notice and emit it as a `tracing` event.
    pub fn push(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Error => tracing::error!("{}", notice.message),
            Severity::Warning => tracing::warn!("{}", notice.message),
            Severity::Success | Severity::Info => tracing::info!("{}", notice.message),
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notice);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    /// Notices still visible at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notice> {
        self.entries.iter().filter(|n| !n.is_expired(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
