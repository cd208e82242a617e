//! Submit state machine shared by every modal and form.
//!
//! ```text
//! Closed ──open──▶ Open ──begin_submit──▶ Submitting ──succeed──▶ Closed
//!                   ▲                          │
//!                   └────── fail / hold ───────┘
//! ```
//!
//! Closing (cancel, backdrop, Escape) from any phase drops the error and any
//! pending confirmation. Every `begin_submit` hands out a [`SubmitTicket`];
//! `succeed`, `fail` and `hold` only act for the ticket of the submission in
//! flight, so a response that lands after the modal was closed (or reopened
//! and submitted again) is ignored.

/// Why a modal was dismissed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseReason {
    Cancel,
    Backdrop,
    Escape,
    Success,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Submit refused: the modal is closed or a submission is already in flight.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmitRefused(pub ModalPhase);

/// Names one `begin_submit`. Tickets are never reused by a modal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// Modal state. `P` is an optional pending confirmation (e.g. a sign-out
/// waiting for the operator to accept a conflict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState<P = ()> {
    phase: ModalPhase,
    error: Option<String>,
    pending: Option<P>,
    generation: u64,
}

impl<P> Default for ModalState<P> {
    fn default() -> Self {
        Self {
            phase: ModalPhase::Closed,
            error: None,
            pending: None,
            generation: 0,
        }
    }
}

impl<P> ModalState<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    /// Inputs and the submit button are disabled while a request is in flight.
    pub fn inputs_disabled(&self) -> bool {
        self.phase == ModalPhase::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self) -> Option<&P> {
        self.pending.as_ref()
    }

    pub fn open(&mut self) {
        self.phase = ModalPhase::Open;
        self.error = None;
        self.pending = None;
    }

    pub fn close(&mut self, reason: CloseReason) {
        if self.pending.is_some() && reason != CloseReason::Success {
            tracing::debug!(?reason, "discarding pending confirmation");
        }
        self.phase = ModalPhase::Closed;
        self.error = None;
        self.pending = None;
    }

    /// Validation failure while open: show the message, stay open.
    pub fn reject(&mut self, message: impl Into<String>) {
        if self.phase == ModalPhase::Open {
            self.error = Some(message.into());
        }
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRefused> {
        if self.phase != ModalPhase::Open {
            return Err(SubmitRefused(self.phase));
        }
        self.phase = ModalPhase::Submitting;
        self.error = None;
        self.generation += 1;
        Ok(SubmitTicket(self.generation))
    }

    /// True while `ticket` names the submission in flight.
    pub fn awaits(&self, ticket: SubmitTicket) -> bool {
        self.phase == ModalPhase::Submitting && ticket.0 == self.generation
    }

    pub fn succeed(&mut self, ticket: SubmitTicket) {
        if self.awaits(ticket) {
            self.close(CloseReason::Success);
        }
    }

    pub fn fail(&mut self, ticket: SubmitTicket, message: impl Into<String>) {
        if self.awaits(ticket) {
            self.phase = ModalPhase::Open;
            self.error = Some(message.into());
        }
    }

    /// Back to open holding a confirmation the operator must accept.
    pub fn hold(&mut self, ticket: SubmitTicket, pending: P, prompt: impl Into<String>) {
        if self.awaits(ticket) {
            self.phase = ModalPhase::Open;
            self.error = Some(prompt.into());
            self.pending = Some(pending);
        }
    }

    pub fn take_pending(&mut self) -> Option<P> {
        self.pending.take()
    }
}
