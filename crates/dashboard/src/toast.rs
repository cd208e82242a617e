//! Transient confirmation messages.

use std::time::Duration;

use fleetdesk_fleet::{SubmissionReceipt, streak_message};

/// Confirmation toasts dismiss themselves after this long.
pub const TOAST_DURATION: Duration = Duration::from_millis(3600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    /// Optional second line (streak encouragement).
    pub detail: Option<String>,
    pub dismiss_after: Duration,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
            dismiss_after: TOAST_DURATION,
        }
    }

    pub fn inspection_submitted(receipt: &SubmissionReceipt) -> Self {
        Self {
            detail: receipt.streak_weeks.and_then(streak_message),
            ..Self::new("Inspection submitted")
        }
    }
}
