//! `fleetdesk-core`: shared building blocks for the fleet operations client.
//!
//! This crate contains **pure** primitives (no IO): typed identifiers, the
//! domain error model, and the display/escaping helpers used by every view.

pub mod error;
pub mod format;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{DeficiencyId, DraftId, KeyId, MinutesId, SubmissionId, VehicleId};
