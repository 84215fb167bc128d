//! User-facing notices. Tools push them onto a channel; the front-end
//! decides how to show them.

use std::time::Duration;
use tokio::sync::mpsc;

use paperdesk_core::error::PaperdeskError;

/// How long a notice normally stays visible.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Render logs are long, so preview failures stay up longer.
pub const EXTENDED_DURATION: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
    pub duration: Duration,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Destructive,
            duration: DEFAULT_DURATION,
        }
    }

    /// Notice for a failed request. Validation errors keep their own title.
    pub fn from_error(title: &str, err: &PaperdeskError) -> Self {
        match err {
            PaperdeskError::Validation { title, message } => Self::destructive(title, message),
            other => Self::destructive(title, other.user_message()),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}
