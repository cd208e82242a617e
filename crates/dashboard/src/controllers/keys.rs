//! Key sign-out and return modals.

use fleetdesk_client::{ApiError, FleetBackend};
use fleetdesk_core::KeyId;
use fleetdesk_fleet::{KeyRecord, KeyReturn, KeyReturnForm, KeySignOut, KeySignOutForm};

use super::{Prepared, Reload, SubmitOutcome, complete_with, prepare_with};
use crate::error::UiError;
use crate::modal::{CloseReason, ModalState, SubmitTicket};

/// Sign-out modal with the conflict check.
///
/// The first submit never forces. If the key is already out the backend
/// answers 409; the modal stays open holding the request, and `confirm`
/// resends it with `force = true`. Closing the modal drops the held request.
#[derive(Debug, Default)]
pub struct SignOutController {
    pub form: KeySignOutForm,
    pub modal: ModalState<KeySignOut>,
}

impl SignOutController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, key_number: Option<&str>) {
        self.form = KeySignOutForm {
            key_number: key_number.unwrap_or_default().to_string(),
            ..KeySignOutForm::default()
        };
        self.modal.open();
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.modal.close(reason);
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.modal.pending().is_some() && !self.modal.inputs_disabled()
    }

    pub fn prepare(&mut self) -> Result<Prepared<KeySignOut>, SubmitOutcome> {
        let form = &self.form;
        self.modal.take_pending();
        prepare_with(&mut self.modal, "key_sign_out", || {
            form.validate().map_err(UiError::from)
        })
    }

    /// Resend the held request with `force` set.
    pub fn prepare_confirmed(&mut self) -> Result<Prepared<KeySignOut>, SubmitOutcome> {
        if self.modal.inputs_disabled() {
            return Err(SubmitOutcome::Refused);
        }
        let request = self.modal.take_pending().ok_or(SubmitOutcome::Refused)?;
        let ticket = self
            .modal
            .begin_submit()
            .map_err(|_| SubmitOutcome::Refused)?;
        Ok(Prepared {
            ticket,
            request: request.confirmed(),
        })
    }

    pub fn complete(
        &mut self,
        Prepared { ticket, request }: Prepared<KeySignOut>,
        result: Result<(), UiError>,
    ) -> SubmitOutcome {
        match result {
            Err(UiError::Remote(ApiError::Conflict { conflict, .. })) if !request.force => {
                if !self.modal.awaits(ticket) {
                    return SubmitOutcome::Superseded;
                }
                let prompt = conflict.prompt();
                tracing::info!(key_number = %request.key_number, "sign-out needs confirmation");
                self.modal.hold(ticket, request, prompt.clone());
                SubmitOutcome::NeedsConfirmation(prompt)
            }
            other => complete_with(
                &mut self.modal,
                ticket,
                "key_sign_out",
                other,
                Reload::SignedOutKeys,
            ),
        }
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        match self.prepare() {
            Ok(prepared) => self.send(backend, prepared).await,
            Err(outcome) => outcome,
        }
    }

    pub async fn confirm(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        match self.prepare_confirmed() {
            Ok(prepared) => self.send(backend, prepared).await,
            Err(outcome) => outcome,
        }
    }

    async fn send(
        &mut self,
        backend: &dyn FleetBackend,
        prepared: Prepared<KeySignOut>,
    ) -> SubmitOutcome {
        let result = backend
            .sign_out_key(&prepared.request)
            .await
            .map_err(UiError::from);
        self.complete(prepared, result)
    }
}

/// Return modal opened from a row of the signed-out table.
#[derive(Debug, Default)]
pub struct ReturnKeyController {
    key_id: Option<KeyId>,
    pub form: KeyReturnForm,
    pub modal: ModalState,
}

impl ReturnKeyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, key: &KeyRecord) {
        self.key_id = Some(key.id);
        self.form = KeyReturnForm::default();
        self.modal.open();
    }

    pub fn close(&mut self, reason: CloseReason) {
        self.modal.close(reason);
        self.key_id = None;
    }

    pub fn prepare(&mut self) -> Result<Prepared<(KeyId, KeyReturn)>, SubmitOutcome> {
        let key_id = self.key_id.ok_or(SubmitOutcome::Refused)?;
        let form = &self.form;
        prepare_with(&mut self.modal, "key_return", || {
            form.validate().map(|body| (key_id, body)).map_err(UiError::from)
        })
    }

    pub fn complete(&mut self, ticket: SubmitTicket, result: Result<(), UiError>) -> SubmitOutcome {
        let outcome = complete_with(
            &mut self.modal,
            ticket,
            "key_return",
            result,
            Reload::SignedOutKeys,
        );
        if !self.modal.is_open() {
            self.key_id = None;
        }
        outcome
    }

    pub async fn submit(&mut self, backend: &dyn FleetBackend) -> SubmitOutcome {
        let Prepared { ticket, request: (id, body) } = match self.prepare() {
            Ok(prepared) => prepared,
            Err(outcome) => return outcome,
        };
        let result = backend.return_key(id, &body).await.map_err(UiError::from);
        self.complete(ticket, result)
    }
}
