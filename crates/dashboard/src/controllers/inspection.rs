//! Weekly inspection form.
//!
//! The form is a page, not a modal, so its state machine is opened on
//! construction and reopened with cleared fields after every success.

use fleetdesk_client::FleetBackend;
use fleetdesk_fleet::{InspectionForm, InspectionSubmission, SubmissionReceipt};

use super::{Completion, Prepared, Reload, SubmitOutcome, prepare_with};
use crate::error::UiError;
use crate::modal::{ModalState, SubmitTicket};
use crate::toast::Toast;

#[derive(Debug)]
pub struct InspectionController {
    pub form: InspectionForm,
    pub state: ModalState,
}

impl Default for InspectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectionController {
    pub fn new() -> Self {
        let mut state = ModalState::new();
        state.open();
        Self {
            form: InspectionForm::default(),
            state,
        }
    }

    pub fn prepare(&mut self) -> Result<Prepared<InspectionSubmission>, SubmitOutcome> {
        let form = &self.form;
        prepare_with(&mut self.state, "inspection_submit", || {
            form.validate().map_err(UiError::from)
        })
    }

    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        result: Result<SubmissionReceipt, UiError>,
    ) -> SubmitOutcome {
        if !self.state.awaits(ticket) {
            tracing::debug!("dropping response of a superseded inspection submit");
            return match result {
                Ok(receipt) => SubmitOutcome::Completed(Completion {
                    reload: Reload::ActiveVehicles,
                    toast: Some(Toast::inspection_submitted(&receipt)),
                }),
                Err(_) => SubmitOutcome::Superseded,
            };
        }
        match result {
            Ok(receipt) => {
                self.state.succeed(ticket);
                tracing::info!(
                    vehicle_id = ?self.form.vehicle_id,
                    streak_weeks = ?receipt.streak_weeks,
                    "inspection recorded"
                );
                // Keep the submitter name for the next vehicle.
                self.form = InspectionForm {
                    submitted_by: std::mem::take(&mut self.form.submitted_by),
                    ..InspectionForm::default()
                };
                self.state.open();
                SubmitOutcome::Completed(Completion {
                    reload: Reload::ActiveVehicles,
                    toast: Some(Toast::inspection_submitted(&receipt)),
                })
            }
            Err(err) => {
                let message = err.report("inspection_submit");
                self.state.fail(ticket, message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = backend
            .submit_inspection(&request)
            .await
            .map_err(UiError::from);
        self.complete(ticket, result)
    }
}
