use fleetdesk_client::FleetBackend;
use fleetdesk_core::MinutesId;
use fleetdesk_fleet::{MeetingMinutes, MinutesDraft, MinutesForm};

use super::{Prepared, Reload, SubmitOutcome, complete_with, prepare_with};
use crate::error::UiError;
use crate::modal::{CloseReason, ModalState, SubmitTicket};

/// Meeting minutes editor. `editing == None` creates a new entry.
#[derive(Debug, Default)]
pub struct MinutesController {
    editing: Option<MinutesId>,
    pub form: MinutesForm,
    pub modal: ModalState,
}

impl MinutesController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = MinutesForm::default();
        self.modal.open();
    }

    pub fn open_edit(&mut self, minutes: &MeetingMinutes) {
        self.editing = Some(minutes.id);
        self.form = MinutesForm::editing(minutes);
        self.modal.open();
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.modal.close(reason);
        self.editing = None;
    }

    pub fn prepare(
        &mut self,
    ) -> Result<Prepared<(Option<MinutesId>, MinutesDraft)>, SubmitOutcome> {
        let editing = self.editing;
        let form = &self.form;
        prepare_with(&mut self.modal, "minutes_save", || {
            form.validate().map(|d| (editing, d)).map_err(UiError::from)
        })
    }

    pub fn complete<T>(&mut self, ticket: SubmitTicket, result: Result<T, UiError>) -> SubmitOutcome {
        complete_with(
            &mut self.modal,
            ticket,
            "minutes_save",
            result,
            Reload::MeetingMinutes,
        )
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request: (editing, draft) } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = match editing {
            Some(id) => backend.update_meeting_minutes(id, &draft).await,
            None => backend.create_meeting_minutes(&draft).await,
        };
        self.complete(ticket, result.map_err(UiError::from))
    }

    /// Delete is a one-click action outside the modal.
    pub async fn delete(&self, backend: &dyn FleetBackend, id: MinutesId) -> SubmitOutcome {
        match backend.delete_meeting_minutes(id).await {
            Ok(()) => {
                tracing::info!(minutes_id = %id, "meeting minutes deleted");
                SubmitOutcome::Completed(super::Completion::reload(Reload::MeetingMinutes))
            }
            Err(err) => SubmitOutcome::Failed(UiError::from(err).report("minutes_delete")),
        }
    }
}
