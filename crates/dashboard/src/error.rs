//! Errors surfaced in a modal's inline error area.

use thiserror::Error;

use fleetdesk_client::ApiError;
use fleetdesk_core::DomainError;

/// Failure of a UI-initiated action.
///
/// Terminal at the boundary: logged, then shown inline. Never rethrown and
/// never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UiError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Remote(#[from] ApiError),
}

impl UiError {
    pub fn user_message(&self) -> String {
        match self {
            UiError::Validation(e) => e.to_string(),
            UiError::Remote(e) => e.user_message(),
        }
    }

    /// Log at the boundary and hand back the inline message.
    pub fn report(&self, action: &str) -> String {
        match self {
            UiError::Validation(e) => tracing::warn!(action, error = %e, "rejected before submit"),
            UiError::Remote(e) => {
                tracing::warn!(action, status = ?e.status(), error = %e, "remote call failed")
            }
        }
        self.user_message()
    }
}
