//! Create/edit deficiency modal on the vehicle detail page.

use fleetdesk_client::FleetBackend;
use fleetdesk_core::{DeficiencyId, DraftId, VehicleId};
use fleetdesk_fleet::{Deficiency, DeficiencyDraft, DeficiencyForm};

use super::{Prepared, Reload, SubmitOutcome, complete_with, prepare_with};
use crate::error::UiError;
use crate::modal::{CloseReason, ModalState, SubmitTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeficiencyTarget {
    /// New row, identified locally until the backend assigns an id.
    Create(DraftId),
    Edit(DeficiencyId),
}

#[derive(Debug)]
pub struct DeficiencyController {
    vehicle_id: VehicleId,
    target: Option<DeficiencyTarget>,
    pub form: DeficiencyForm,
    pub modal: ModalState,
}

impl DeficiencyController {
    pub fn new(vehicle_id: VehicleId) -> Self {
        Self {
            vehicle_id,
            target: None,
            form: DeficiencyForm::default(),
            modal: ModalState::new(),
        }
    }

    pub fn target(&self) -> Option<DeficiencyTarget> {
        self.target
    }

    /// Draft id of the unsaved row, while creating.
    pub fn draft(&self) -> Option<DraftId> {
        match self.target {
            Some(DeficiencyTarget::Create(id)) if self.modal.is_open() => Some(id),
            _ => None,
        }
    }

    pub fn open_create(&mut self, inspector_name: impl Into<String>) {
        self.target = Some(DeficiencyTarget::Create(DraftId::new()));
        self.form = DeficiencyForm {
            inspector_name: inspector_name.into(),
            ..DeficiencyForm::default()
        };
        self.modal.open();
    }

    /// Rows without a backend id cannot be edited.
    pub fn open_edit(&mut self, deficiency: &Deficiency, inspector_name: impl Into<String>) -> bool {
        let Some(id) = deficiency.id else {
            tracing::warn!(vehicle_id = %self.vehicle_id, "deficiency without id is not editable");
            return false;
        };
        self.target = Some(DeficiencyTarget::Edit(id));
        self.form = DeficiencyForm::editing(deficiency, inspector_name);
        self.modal.open();
        true
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.modal.close(reason);
        self.target = None;
    }

    pub fn prepare(
        &mut self,
    ) -> Result<Prepared<(DeficiencyTarget, DeficiencyDraft)>, SubmitOutcome> {
        let target = self.target.ok_or(SubmitOutcome::Refused)?;
        let form = &self.form;
        prepare_with(&mut self.modal, "deficiency_save", || {
            form.validate().map(|d| (target, d)).map_err(UiError::from)
        })
    }

    pub fn complete(&mut self, ticket: SubmitTicket, result: Result<(), UiError>) -> SubmitOutcome {
        let outcome = complete_with(
            &mut self.modal,
            ticket,
            "deficiency_save",
            result,
            Reload::Vehicle(self.vehicle_id),
        );
        if !self.modal.is_open() {
            self.target = None;
        }
        outcome
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request: (target, draft) } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = match target {
            DeficiencyTarget::Create(_) => backend.create_deficiency(self.vehicle_id, &draft).await,
            DeficiencyTarget::Edit(id) => backend.update_deficiency(id, &draft).await,
        };
        self.complete(ticket, result.map_err(UiError::from))
    }
}
