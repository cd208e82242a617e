//! Fleet triage domain (pure).
//!
//! This crate contains the client-side rules for the fleet dashboard,
//! implemented as deterministic logic over backend snapshots (no IO, no HTTP,
//! no rendering). The backend stays authoritative: nothing here mutates a
//! snapshot, it only normalizes, classifies, filters and validates.

mod fields;

pub mod deficiency;
pub mod issues;
pub mod keys;
pub mod minutes;
pub mod streak;
pub mod submission;
pub mod triage;
pub mod updates;
pub mod vehicle;

pub use deficiency::{Deficiency, DeficiencyDraft, DeficiencyForm, DeficiencyStatus};
pub use issues::{IssueFlags, IssueTag, OverduePolicy};
pub use keys::{KeyConflict, KeyRecord, KeyReturn, KeyReturnForm, KeySignOut, KeySignOutForm};
pub use minutes::{MeetingMinutes, MinutesDraft, MinutesForm};
pub use streak::{StreakTier, streak_message};
pub use submission::{FluidLevel, InspectionForm, InspectionSubmission, SubmissionReceipt};
pub use triage::{TagCounts, TriageEntry, TriageQuery};
pub use updates::{ServiceForm, ServiceUpdate, StatusChangeForm, StatusUpdate};
pub use vehicle::{ActiveVehicle, Vehicle, VehicleStatus, normalize_snapshot};
