use fleetdesk_client::FleetBackend;
use fleetdesk_core::VehicleId;
use fleetdesk_fleet::{ServiceForm, ServiceUpdate};

use super::{Prepared, Reload, SubmitOutcome, complete_with, prepare_with};
use crate::error::UiError;
use crate::modal::{ModalState, SubmitTicket};

/// Service panel of the vehicle detail page.
#[derive(Debug)]
pub struct ServiceController {
    vehicle_id: VehicleId,
    pub form: ServiceForm,
    pub modal: ModalState,
}

impl ServiceController {
    pub fn new(vehicle_id: VehicleId) -> Self {
        Self {
            vehicle_id,
            form: ServiceForm::default(),
            modal: ModalState::new(),
        }
    }

    pub fn open(&mut self) {
        self.form = ServiceForm::default();
        self.modal.open();
    }

    pub fn prepare(&mut self) -> Result<Prepared<ServiceUpdate>, SubmitOutcome> {
        let form = &self.form;
        prepare_with(&mut self.modal, "service_update", || {
            form.validate().map_err(UiError::from)
        })
    }

    pub fn complete(&mut self, ticket: SubmitTicket, result: Result<(), UiError>) -> SubmitOutcome {
        complete_with(
            &mut self.modal,
            ticket,
            "service_update",
            result,
            Reload::Vehicle(self.vehicle_id),
        )
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = backend
            .update_vehicle_service(self.vehicle_id, &request)
            .await
            .map_err(UiError::from);
        self.complete(ticket, result)
    }
}
