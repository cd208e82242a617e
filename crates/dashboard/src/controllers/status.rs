//! Status-change modal on the triage list.

use fleetdesk_client::FleetBackend;
use fleetdesk_core::VehicleId;
use fleetdesk_fleet::{StatusChangeForm, StatusUpdate, Vehicle};

use super::{Prepared, Reload, SubmitOutcome, complete_with, prepare_with};
use crate::error::UiError;
use crate::modal::{CloseReason, ModalState, SubmitTicket};

#[derive(Debug, Default)]
pub struct StatusController {
    vehicle_id: Option<VehicleId>,
    pub form: StatusChangeForm,
    pub modal: ModalState,
}

impl StatusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open prefilled with the vehicle's current status.
    pub fn open(&mut self, vehicle: &Vehicle) {
        self.vehicle_id = Some(vehicle.id);
        self.form = StatusChangeForm {
            status: vehicle.status,
            ..StatusChangeForm::default()
        };
        self.modal.open();
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.vehicle_id
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.modal.close(reason);
        self.vehicle_id = None;
    }

    pub fn prepare(&mut self) -> Result<Prepared<(VehicleId, StatusUpdate)>, SubmitOutcome> {
        let vehicle_id = self.vehicle_id.ok_or(SubmitOutcome::Refused)?;
        let form = &self.form;
        prepare_with(&mut self.modal, "status_change", || {
            form.validate().map(|u| (vehicle_id, u)).map_err(UiError::from)
        })
    }

    pub fn complete(&mut self, ticket: SubmitTicket, result: Result<(), UiError>) -> SubmitOutcome {
        let outcome = complete_with(
            &mut self.modal,
            ticket,
            "status_change",
            result,
            Reload::Snapshot,
        );
        if !self.modal.is_open() {
            self.vehicle_id = None;
        }
        outcome
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request: (id, update) } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = backend
            .update_vehicle_status(id, &update)
            .await
            .map_err(UiError::from);
        self.complete(ticket, result)
    }
}
