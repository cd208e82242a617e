//! In-memory filter/sort engine for the triage list.
//!
//! - Search: case-insensitive substring over driver, make/model, plate, label.
//! - Filters: OR semantics. No active toggle ⇒ everything passes.
//! - Sort: status priority descending, then lower-cased label ascending.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::issues::{IssueFlags, IssueTag, OverduePolicy};
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageQuery {
    pub text: String,
    pub filters: BTreeSet<IssueTag>,
}

impl TriageQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: BTreeSet::new(),
        }
    }

    pub fn with_filter(mut self, tag: IssueTag) -> Self {
        self.filters.insert(tag);
        self
    }

    /// Flip a filter toggle; returns whether it is now active.
    pub fn toggle(&mut self, tag: IssueTag) -> bool {
        if self.filters.remove(&tag) {
            false
        } else {
            self.filters.insert(tag);
            true
        }
    }

    pub fn matches_search(&self, vehicle: &Vehicle) -> bool {
        let needle = self.text.trim().to_lowercase();
        needle.is_empty() || vehicle.search_text().contains(&needle)
    }

    pub fn matches_filters(&self, flags: &IssueFlags) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|tag| flags.has(*tag))
    }
}

/// One visible row: the vehicle and its derived flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageEntry<'a> {
    pub vehicle: &'a Vehicle,
    pub flags: IssueFlags,
}

/// Total order used by the triage list.
pub fn compare(a: &Vehicle, b: &Vehicle) -> Ordering {
    b.status
        .priority()
        .cmp(&a.status.priority())
        .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
}

pub fn sort_vehicles(vehicles: &mut [Vehicle]) {
    vehicles.sort_by(compare);
}

/// Filter and sort the snapshot into the visible rows.
pub fn apply<'a>(
    vehicles: &'a [Vehicle],
    query: &TriageQuery,
    policy: &OverduePolicy,
    now: DateTime<Utc>,
) -> Vec<TriageEntry<'a>> {
    let mut entries: Vec<TriageEntry<'a>> = vehicles
        .iter()
        .filter(|v| query.matches_search(v))
        .map(|v| TriageEntry {
            vehicle: v,
            flags: IssueFlags::classify(v, policy, now),
        })
        .filter(|e| query.matches_filters(&e.flags))
        .collect();
    entries.sort_by(|a, b| compare(a.vehicle, b.vehicle));
    entries
}

/// Per-tag counts over the whole snapshot (not the filtered view).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagCounts {
    pub total: usize,
    pub open_defs: usize,
    pub insp_overdue: usize,
    pub km_overdue: usize,
}

impl TagCounts {
    pub fn tally(vehicles: &[Vehicle], policy: &OverduePolicy, now: DateTime<Utc>) -> Self {
        vehicles.iter().fold(Self::default(), |mut acc, v| {
            let flags = IssueFlags::classify(v, policy, now);
            acc.total += 1;
            acc.open_defs += usize::from(flags.open_deficiencies);
            acc.insp_overdue += usize::from(flags.inspection_overdue);
            acc.km_overdue += usize::from(flags.km_overdue);
            acc
        })
    }

    pub fn get(&self, tag: IssueTag) -> usize {
        match tag {
            IssueTag::OpenDefs => self.open_defs,
            IssueTag::InspOverdue => self.insp_overdue,
            IssueTag::KmOverdue => self.km_overdue,
        }
    }
}
