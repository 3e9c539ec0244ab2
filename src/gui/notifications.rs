//! Notification entries shown in the toast and the history window.

use std::collections::VecDeque;

use crate::error::{classify, ErrorKind};

/// Oldest entries are dropped past this many
pub const MAX_NOTIFICATIONS: usize = 200;

#[derive(Clone, Debug)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
    /// Set for failures so the history can color them
    pub kind: Option<ErrorKind>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
            kind: None,
        }
    }

    /// Failure notice: "<action> failed (<category>): <error>", plus the category's hint
    pub fn failure(action: &str, err: &anyhow::Error) -> Self {
        let kind = classify(err);
        tracing::error!("{} failed ({}): {:#}", action, kind.label(), err);

        let mut message = format!("{} failed ({}): {}", action, kind.label(), err);
        if let Some(hint) = kind.hint() {
            message.push(' ');
            message.push_str(hint);
        }
        Self {
            message,
            timestamp: chrono::Local::now(),
            kind: Some(kind),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind.is_some()
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }

    /// First `max_chars` characters, with an ellipsis when cut
    pub fn preview(&self, max_chars: usize) -> String {
        if self.message.chars().count() > max_chars {
            let head: String = self.message.chars().take(max_chars).collect();
            format!("{}...", head)
        } else {
            self.message.clone()
        }
    }
}

/// Append `entry`, dropping the oldest entries beyond [`MAX_NOTIFICATIONS`]
pub fn push_capped(history: &mut VecDeque<NotificationEntry>, entry: NotificationEntry) {
    history.push_back(entry);
    while history.len() > MAX_NOTIFICATIONS {
        history.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_failure_includes_classification_and_hint() {
        let err = anyhow!("Ledger device: user rejected the request");
        let entry = NotificationEntry::failure("Confirm transaction 2", &err);

        assert_eq!(entry.kind, Some(ErrorKind::WalletRejected));
        assert!(entry.message.starts_with("Confirm transaction 2 failed (rejected in wallet)"));
        assert!(entry.message.contains("declined in the wallet"));
        assert!(entry.is_failure());
    }

    #[test]
    fn test_plain_entry_is_not_failure() {
        let entry = NotificationEntry::new("Switched to Sepolia");
        assert!(!entry.is_failure());
        assert_eq!(entry.time_ago(), "just now");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let entry = NotificationEntry::new("✅ Sent ✅ Sent ✅ Sent");
        assert_eq!(entry.preview(6), "✅ Sent...");
        assert_eq!(entry.preview(100), entry.message);
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = VecDeque::new();
        for i in 0..MAX_NOTIFICATIONS + 5 {
            push_capped(&mut history, NotificationEntry::new(format!("entry {}", i)));
        }
        assert_eq!(history.len(), MAX_NOTIFICATIONS);
        assert_eq!(history.front().unwrap().message, "entry 5");
        assert_eq!(
            history.back().unwrap().message,
            format!("entry {}", MAX_NOTIFICATIONS + 4)
        );
    }
}
