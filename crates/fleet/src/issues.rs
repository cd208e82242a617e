//! Derived issue classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vehicle::{Vehicle, VehicleStatus};

/// Default number of days after which a missing inspection counts as overdue.
pub const DEFAULT_INSPECTION_OVERDUE_DAYS: u32 = 7;

/// Issue tag derived client-side from a vehicle record.
///
/// Declaration order is display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueTag {
    OpenDefs,
    InspOverdue,
    KmOverdue,
}

impl IssueTag {
    pub const ALL: [IssueTag; 3] = [IssueTag::OpenDefs, IssueTag::InspOverdue, IssueTag::KmOverdue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenDefs => "OPEN_DEFS",
            Self::InspOverdue => "INSP_OVERDUE",
            Self::KmOverdue => "KM_OVERDUE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenDefs => "Open deficiencies",
            Self::InspOverdue => "Inspection overdue",
            Self::KmOverdue => "KM overdue",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Threshold used when the backend did not precompute `inspection_is_overdue`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OverduePolicy {
    pub days: u32,
}

impl OverduePolicy {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for OverduePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INSPECTION_OVERDUE_DAYS)
    }
}

/// Boolean issue flags for one vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct IssueFlags {
    pub open_deficiencies: bool,
    pub inspection_overdue: bool,
    pub km_overdue: bool,
}

impl IssueFlags {
    /// Classify a vehicle. Pure: depends only on the record, the policy and `now`.
    pub fn classify(vehicle: &Vehicle, policy: &OverduePolicy, now: DateTime<Utc>) -> Self {
        Self {
            open_deficiencies: vehicle.open_deficiency_count > 0
                || vehicle.status == VehicleStatus::Deficient,
            inspection_overdue: inspection_overdue(vehicle, policy, now),
            km_overdue: km_overdue(vehicle),
        }
    }

    pub fn has(&self, tag: IssueTag) -> bool {
        match tag {
            IssueTag::OpenDefs => self.open_deficiencies,
            IssueTag::InspOverdue => self.inspection_overdue,
            IssueTag::KmOverdue => self.km_overdue,
        }
    }

    /// Active tags in display order.
    pub fn tags(&self) -> Vec<IssueTag> {
        IssueTag::ALL.into_iter().filter(|t| self.has(*t)).collect()
    }

    pub fn is_clear(&self) -> bool {
        !(self.open_deficiencies || self.inspection_overdue || self.km_overdue)
    }
}

fn inspection_overdue(vehicle: &Vehicle, policy: &OverduePolicy, now: DateTime<Utc>) -> bool {
    if let Some(flag) = vehicle.inspection_is_overdue {
        return flag;
    }
    match vehicle.last_submission_at {
        None => true,
        Some(at) => {
            let age_days = now.signed_duration_since(at).num_seconds() as f64 / 86_400.0;
            age_days > f64::from(policy.days)
        }
    }
}

fn km_overdue(vehicle: &Vehicle) -> bool {
    if let Some(remaining) = vehicle.km_remaining {
        return remaining <= 0.0;
    }
    match (vehicle.current_km, vehicle.service_due_km) {
        (Some(current), Some(due)) => current >= due,
        _ => false,
    }
}
