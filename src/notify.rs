//! User-facing notifications.
//!
//! Services return results; the presentation layer turns them into a
//! `Notice` and hands it to whatever `Notifier` it renders with.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
    Edit,
    Delete,
}

impl NoticeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✕",
            NoticeKind::Info => "ℹ",
            NoticeKind::Warning => "⚠",
            NoticeKind::Edit => "✏️",
            NoticeKind::Delete => "🗑️",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Success)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Receives notices for display. Purely cosmetic; nothing is returned.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to stdout, one per line.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        println!("{}", notice);
    }
}

/// Forwards notices to the tracing subscriber.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::error!(kind = ?notice.kind, "{}", notice.message),
            NoticeKind::Warning => tracing::warn!(kind = ?notice.kind, "{}", notice.message),
            _ => tracing::info!(kind = ?notice.kind, "{}", notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<Notice>>);

    impl Notifier for Recorder {
        fn notify(&self, notice: &Notice) {
            self.0.borrow_mut().push(notice.clone());
        }
    }

    #[test]
    fn kinds_serialize_lowercase() {
        let json = serde_json::to_string(&NoticeKind::Delete).unwrap();
        assert_eq!(json, "\"delete\"");
    }

    #[test]
    fn notifier_receives_notice() {
        let recorder = Recorder(RefCell::new(vec![]));
        recorder.notify(&Notice::new("Post updated successfully!", NoticeKind::Edit));
        let seen = recorder.0.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NoticeKind::Edit);
    }

    #[test]
    fn display_prefixes_icon() {
        assert_eq!(Notice::success("done").to_string(), "✓ done");
    }
}
