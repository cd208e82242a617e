//! Form and modal controllers.
//!
//! Each controller owns its form fields and a [`ModalState`]. Submitting is
//! split into `prepare` (validate, move to submitting) and `complete` (apply
//! the backend's answer) so a second submit while one is in flight is
//! refused by the state machine; `submit` runs both against a backend.
//! `prepare` hands back the [`SubmitTicket`] that `complete` must present.
//!
//! On success a controller never edits local copies of backend data. It
//! returns a [`Reload`] naming the collection the page must refetch.
//!
//! [`ModalState`]: crate::modal::ModalState
//! [`SubmitTicket`]: crate::modal::SubmitTicket

pub mod deficiency;
pub mod inspection;
pub mod keys;
pub mod minutes;
pub mod service;
pub mod status;

use fleetdesk_core::VehicleId;

use crate::error::UiError;
use crate::modal::{ModalState, SubmitTicket};
use crate::toast::Toast;

pub use deficiency::DeficiencyController;
pub use inspection::InspectionController;
pub use keys::{ReturnKeyController, SignOutController};
pub use minutes::MinutesController;
pub use service::ServiceController;
pub use status::StatusController;

/// Backend-owned collection to refetch after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    /// The triage snapshot.
    Snapshot,
    /// The inspection form's vehicle picker.
    ActiveVehicles,
    /// One vehicle through `GET /api/vehicles/{id}` (detail and deficiencies).
    Vehicle(VehicleId),
    SignedOutKeys,
    MeetingMinutes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub reload: Reload,
    pub toast: Option<Toast>,
}

impl Completion {
    pub fn reload(reload: Reload) -> Self {
        Self { reload, toast: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed(Completion),
    /// Client-side validation failed; nothing was sent.
    Rejected(String),
    /// The backend answered with an error; the modal stays open with it.
    Failed(String),
    /// The backend asked for confirmation; see the controller's `confirm`.
    NeedsConfirmation(String),
    /// Not open, or a submission is already in flight.
    Refused,
    /// A failure for a submission the modal stopped waiting on; nothing
    /// changed on screen.
    Superseded,
}

/// A validated request and the ticket of the submission it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared<T> {
    pub ticket: SubmitTicket,
    pub request: T,
}

impl SubmitOutcome {
    pub fn completion(&self) -> Option<&Completion> {
        match self {
            SubmitOutcome::Completed(c) => Some(c),
            _ => None,
        }
    }
}

/// `prepare` step shared by the controllers: validate while open, then move
/// to submitting.
pub(crate) fn prepare_with<P, T>(
    modal: &mut ModalState<P>,
    action: &str,
    validate: impl FnOnce() -> Result<T, UiError>,
) -> Result<Prepared<T>, SubmitOutcome> {
    if !modal.is_open() || modal.inputs_disabled() {
        tracing::debug!(action, phase = ?modal.phase(), "submit refused");
        return Err(SubmitOutcome::Refused);
    }
    let request = match validate() {
        Ok(request) => request,
        Err(err) => {
            let message = err.report(action);
            modal.reject(message.clone());
            return Err(SubmitOutcome::Rejected(message));
        }
    };
    let ticket = modal.begin_submit().map_err(|_| SubmitOutcome::Refused)?;
    Ok(Prepared { ticket, request })
}

/// `complete` step for mutations whose only follow-up is a reload.
///
/// A stale success still returns its reload; a stale failure is dropped.
pub(crate) fn complete_with<P, T>(
    modal: &mut ModalState<P>,
    ticket: SubmitTicket,
    action: &str,
    result: Result<T, UiError>,
    reload: Reload,
) -> SubmitOutcome {
    let current = modal.awaits(ticket);
    match result {
        Ok(_) => {
            modal.succeed(ticket);
            tracing::info!(action, ?reload, current, "submitted");
            SubmitOutcome::Completed(Completion::reload(reload))
        }
        Err(err) if !current => {
            tracing::debug!(action, error = %err, "dropping failure of a superseded submit");
            SubmitOutcome::Superseded
        }
        Err(err) => {
            let message = err.report(action);
            modal.fail(ticket, message.clone());
            SubmitOutcome::Failed(message)
        }
    }
}
