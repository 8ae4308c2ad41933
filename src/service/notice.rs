//! Transient user-facing notices and the indicator state the host renders.

use std::time::Duration;

use crate::config::UiConfig;

/// How long a notice stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLength {
    Short,
    Long,
}

impl NoticeLength {
    /// On-screen duration for this length under `ui`.
    pub fn duration(self, ui: &UiConfig) -> Duration {
        Duration::from_millis(match self {
            NoticeLength::Short => ui.short_notice_ms,
            NoticeLength::Long => ui.long_notice_ms,
        })
    }
}

/// A toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub length: NoticeLength,
}

impl Notice {
    pub fn short(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            length: NoticeLength::Short,
        }
    }

    pub fn long(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            length: NoticeLength::Long,
        }
    }
}

/// What the host shows around the keyboard.
///
/// `progress_visible` and `translate_enabled` are always opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardUi {
    pub progress_visible: bool,
    pub translate_enabled: bool,
}
