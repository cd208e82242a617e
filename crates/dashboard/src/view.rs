//! Triage list state and its transitions.
//!
//! Every interaction is a [`TriageAction`]; [`TriageView::apply`] mutates the
//! state and reports how much of the page has to be redrawn. Rendering is a
//! pure function of the view (see [`crate::render`]).

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use fleetdesk_core::VehicleId;
use fleetdesk_fleet::triage::{self, TagCounts, TriageEntry, TriageQuery};
use fleetdesk_fleet::{IssueTag, OverduePolicy, Vehicle};

/// Remote data as the page sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    /// Inline message for the error panel.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriageAction {
    /// A fetch was started; the list shows the loading state.
    Reloading,
    SnapshotLoaded(Vec<Vehicle>),
    SnapshotFailed(String),
    SetSearch(String),
    ToggleFilter(IssueTag),
    ClearFilters,
    /// New inspection overdue threshold in days.
    SetThreshold(u32),
    ToggleRow(VehicleId),
    ToggleShowAll(VehicleId),
}

/// What the caller must redraw after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    Nothing,
    /// Summary counts and the whole list.
    Full,
    /// A single row, patched in place.
    Row(VehicleId),
    /// The snapshot depends on the new state; fetch it, then render.
    Refetch,
}

#[derive(Debug, Clone, Default)]
pub struct TriageView {
    pub snapshot: LoadState<Vec<Vehicle>>,
    pub query: TriageQuery,
    pub policy: OverduePolicy,
    expanded: HashSet<VehicleId>,
    show_all: HashSet<VehicleId>,
}

impl TriageView {
    pub fn new(policy: OverduePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: TriageAction) -> RenderScope {
        match action {
            TriageAction::Reloading => {
                self.snapshot = LoadState::Loading;
                RenderScope::Full
            }
            TriageAction::SnapshotLoaded(vehicles) => {
                // Expansion survives a reload for rows that still exist.
                let ids: HashSet<VehicleId> = vehicles.iter().map(|v| v.id).collect();
                self.expanded.retain(|id| ids.contains(id));
                self.show_all.retain(|id| ids.contains(id));
                self.snapshot = LoadState::Loaded(vehicles);
                RenderScope::Full
            }
            TriageAction::SnapshotFailed(message) => {
                self.snapshot = LoadState::Failed(message);
                self.collapse_all();
                RenderScope::Full
            }
            TriageAction::SetSearch(text) => {
                if text == self.query.text {
                    return RenderScope::Nothing;
                }
                self.query.text = text;
                self.collapse_all();
                RenderScope::Full
            }
            TriageAction::ToggleFilter(tag) => {
                self.query.toggle(tag);
                self.collapse_all();
                RenderScope::Full
            }
            TriageAction::ClearFilters => {
                if self.query.filters.is_empty() {
                    return RenderScope::Nothing;
                }
                self.query.filters.clear();
                self.collapse_all();
                RenderScope::Full
            }
            TriageAction::SetThreshold(days) => {
                if days == self.policy.days {
                    return RenderScope::Nothing;
                }
                self.policy = OverduePolicy::new(days);
                self.collapse_all();
                RenderScope::Refetch
            }
            TriageAction::ToggleRow(id) => {
                if !self.contains(id) {
                    return RenderScope::Nothing;
                }
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                } else {
                    self.show_all.remove(&id);
                }
                RenderScope::Row(id)
            }
            TriageAction::ToggleShowAll(id) => {
                if !self.expanded.contains(&id) {
                    return RenderScope::Nothing;
                }
                if !self.show_all.remove(&id) {
                    self.show_all.insert(id);
                }
                RenderScope::Row(id)
            }
        }
    }

    pub fn is_expanded(&self, id: VehicleId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn shows_all(&self, id: VehicleId) -> bool {
        self.show_all.contains(&id)
    }

    pub fn has_expanded_rows(&self) -> bool {
        !self.expanded.is_empty()
    }

    /// Visible rows, filtered and sorted. Empty unless loaded.
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<TriageEntry<'_>> {
        match &self.snapshot {
            LoadState::Loaded(vehicles) => triage::apply(vehicles, &self.query, &self.policy, now),
            _ => Vec::new(),
        }
    }

    /// Counts over the whole snapshot; zero while loading or failed.
    pub fn counts(&self, now: DateTime<Utc>) -> TagCounts {
        self.snapshot
            .loaded()
            .map(|vehicles| TagCounts::tally(vehicles, &self.policy, now))
            .unwrap_or_default()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.snapshot.loaded()?.iter().find(|v| v.id == id)
    }

    fn contains(&self, id: VehicleId) -> bool {
        self.vehicle(id).is_some()
    }

    fn collapse_all(&mut self) {
        self.expanded.clear();
        self.show_all.clear();
    }
}
