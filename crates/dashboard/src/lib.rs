//! `fleetdesk-dashboard`
//!
//! **Responsibility:** the operator-facing side of the fleet client.
//!
//! This crate provides:
//! - Explicit view state with unidirectional `action → state → render`
//! - HTML fragment rendering (full list and targeted row patches)
//! - Modal/form controllers on a shared submit state machine
//! - Search debounce, periodic refresh, and the scanner stream lifetime
//!
//! The backend remains the authority: controllers never patch local copies,
//! they return a [`controllers::Reload`] directive and the page refetches.

pub mod config;
pub mod controllers;
pub mod error;
pub mod modal;
pub mod pages;
pub mod refresh;
pub mod render;
pub mod scanner;
pub mod search;
pub mod toast;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::DashboardConfig;
pub use error::UiError;
pub use modal::{CloseReason, ModalPhase, ModalState, SubmitTicket};
pub use pages::{InspectionPage, KeysPage, MinutesPage, PageUpdate, TriagePage, VehicleDetailPage};
pub use view::{LoadState, RenderScope, TriageAction, TriageView};
