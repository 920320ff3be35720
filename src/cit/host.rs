//! Host surface used by the orchestrator
//!
//! Prompts resolve to `None` when the user dismisses them. Cancellation is an
//! ordinary answer, not an error.

use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// Interactive environment the orchestrator runs in
pub trait Host: Send + Sync {
    /// Ask for free text
    fn input_box(
        &self,
        prompt: &str,
        placeholder: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Ask the user to pick one of `items`
    fn quick_pick(
        &self,
        items: Vec<String>,
        placeholder: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Show a message without waiting for the user
    fn notify(&self, notification: Notification);
}
