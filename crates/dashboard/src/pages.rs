//! Page orchestration: fetch → view state → render, and reload after writes.
//!
//! Pages own an `Arc<dyn FleetBackend>` plus the controllers shown on them.
//! A controller's [`Reload`] is honoured by the page that shows that
//! collection; directives for collections not on the page are ignored.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use fleetdesk_client::FleetBackend;
use fleetdesk_core::format::{escape_html, format_km};
use fleetdesk_core::{DeficiencyId, KeyId, MinutesId, VehicleId};
use fleetdesk_fleet::{ActiveVehicle, KeyRecord, MeetingMinutes, OverduePolicy, Vehicle};

use crate::controllers::{
    DeficiencyController, InspectionController, MinutesController, Reload, ReturnKeyController,
    ServiceController, SignOutController, StatusController, SubmitOutcome,
};
use crate::error::UiError;
use crate::render::{self, RowPatch};
use crate::search::{KeySearch, SearchDebouncer};
use crate::toast::Toast;
use crate::view::{LoadState, RenderScope, TriageAction, TriageView};

/// Result of dispatching an action on the triage page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageUpdate {
    Unchanged,
    Full(String),
    Patch(RowPatch),
}

async fn fetch<T>(
    action: &str,
    call: impl std::future::Future<Output = fleetdesk_client::ApiResult<T>>,
) -> LoadState<T> {
    match call.await {
        Ok(data) => LoadState::Loaded(data),
        Err(err) => LoadState::Failed(UiError::from(err).report(action)),
    }
}

pub struct TriagePage {
    backend: Arc<dyn FleetBackend>,
    view: TriageView,
    pub status: StatusController,
}

impl TriagePage {
    pub fn new(backend: Arc<dyn FleetBackend>, policy: OverduePolicy) -> Self {
        Self {
            backend,
            view: TriageView::new(policy),
            status: StatusController::new(),
        }
    }

    pub fn view(&self) -> &TriageView {
        &self.view
    }

    /// Fetch the snapshot for the current threshold. Failures land in the
    /// view as the error panel; there is no retry.
    pub async fn load(&mut self) {
        self.view.apply(TriageAction::Reloading);
        let days = self.view.policy.days;
        let action = match self.backend.triage_snapshot(days).await {
            Ok(vehicles) => TriageAction::SnapshotLoaded(vehicles),
            Err(err) => TriageAction::SnapshotFailed(UiError::from(err).report("triage_load")),
        };
        self.view.apply(action);
    }

    pub fn render(&self, now: DateTime<Utc>) -> String {
        render::render_triage(&self.view, now)
    }

    pub async fn dispatch(&mut self, action: TriageAction, now: DateTime<Utc>) -> PageUpdate {
        match self.view.apply(action) {
            RenderScope::Nothing => PageUpdate::Unchanged,
            RenderScope::Full => PageUpdate::Full(self.render(now)),
            RenderScope::Row(id) => match render::row_patch(&self.view, id, now) {
                Some(patch) => PageUpdate::Patch(patch),
                None => PageUpdate::Full(self.render(now)),
            },
            RenderScope::Refetch => {
                self.load().await;
                PageUpdate::Full(self.render(now))
            }
        }
    }

    pub fn open_status(&mut self, id: VehicleId) -> bool {
        match self.view.vehicle(id) {
            Some(vehicle) => {
                self.status.open(vehicle);
                true
            }
            None => false,
        }
    }

    pub async fn submit_status(&mut self) -> SubmitOutcome {
        let outcome = self.status.submit(self.backend.as_ref()).await;
        if let Some(completion) = outcome.completion() {
            self.apply_reload(completion.reload).await;
        }
        outcome
    }

    async fn apply_reload(&mut self, reload: Reload) {
        match reload {
            Reload::Snapshot => self.load().await,
            other => tracing::debug!(?other, "reload not shown on the triage page"),
        }
    }
}

/// Vehicle detail: deficiency list and service panel.
pub struct VehicleDetailPage {
    backend: Arc<dyn FleetBackend>,
    vehicle_id: VehicleId,
    pub vehicle: LoadState<Vehicle>,
    /// Name typed into the inspector field; default attribution for edits.
    pub inspector_name: String,
    pub deficiency: DeficiencyController,
    pub service: ServiceController,
}

impl VehicleDetailPage {
    pub fn new(backend: Arc<dyn FleetBackend>, vehicle_id: VehicleId) -> Self {
        Self {
            backend,
            vehicle_id,
            vehicle: LoadState::Loading,
            inspector_name: String::new(),
            deficiency: DeficiencyController::new(vehicle_id),
            service: ServiceController::new(vehicle_id),
        }
    }

    pub async fn load(&mut self) {
        self.vehicle = fetch("vehicle_load", self.backend.vehicle(self.vehicle_id)).await;
    }

    pub fn open_create_deficiency(&mut self) {
        self.deficiency.open_create(self.inspector_name.clone());
    }

    pub fn open_edit_deficiency(&mut self, id: DeficiencyId) -> bool {
        let Some(vehicle) = self.vehicle.loaded() else {
            return false;
        };
        match vehicle.deficiencies.iter().find(|d| d.id == Some(id)) {
            Some(deficiency) => self
                .deficiency
                .open_edit(deficiency, self.inspector_name.clone()),
            None => false,
        }
    }

    pub async fn submit_deficiency(&mut self) -> SubmitOutcome {
        let outcome = self.deficiency.submit(self.backend.as_ref()).await;
        self.after(&outcome).await;
        outcome
    }

    pub async fn submit_service(&mut self) -> SubmitOutcome {
        let outcome = self.service.submit(self.backend.as_ref()).await;
        self.after(&outcome).await;
        outcome
    }

    async fn after(&mut self, outcome: &SubmitOutcome) {
        match outcome.completion().map(|c| c.reload) {
            Some(Reload::Vehicle(id)) if id == self.vehicle_id => self.load().await,
            Some(other) => tracing::debug!(?other, "reload not shown on the vehicle page"),
            None => {}
        }
    }

    pub fn render(&self) -> String {
        match &self.vehicle {
            LoadState::Loading => r#"<div class="vehicle-loading">Loading vehicle…</div>"#.to_string(),
            LoadState::Failed(message) => render::render_error_panel(message),
            LoadState::Loaded(vehicle) => {
                let mut html = format!(
                    r#"<header class="vehicle-header"><h2>{}</h2>{}<span class="km">{}</span></header>"#,
                    escape_html(&vehicle.display_label()),
                    render::status_badge(vehicle.status),
                    format_km(vehicle.current_km),
                );
                html.push_str(&render::render_deficiency_panel(vehicle, self.deficiency.draft()));
                html.push_str(&render::render_modal_error(&self.deficiency.modal));
                html.push_str(&render::render_modal_error(&self.service.modal));
                html
            }
        }
    }
}

/// Weekly inspection form with its vehicle picker.
pub struct InspectionPage {
    backend: Arc<dyn FleetBackend>,
    pub vehicles: LoadState<Vec<ActiveVehicle>>,
    pub controller: InspectionController,
    pub toast: Option<Toast>,
}

impl InspectionPage {
    pub fn new(backend: Arc<dyn FleetBackend>) -> Self {
        Self {
            backend,
            vehicles: LoadState::Loading,
            controller: InspectionController::new(),
            toast: None,
        }
    }

    pub async fn load(&mut self) {
        self.vehicles = fetch("active_vehicles_load", self.backend.active_vehicles()).await;
    }

    /// Select from the picker. Ids not in the list are ignored.
    pub fn select_vehicle(&mut self, id: VehicleId) -> bool {
        let known = self
            .vehicles
            .loaded()
            .is_some_and(|list| list.iter().any(|v| v.id == id));
        if known {
            self.controller.form.vehicle_id = Some(id);
        }
        known
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.controller.submit(self.backend.as_ref()).await;
        if let Some(completion) = outcome.completion() {
            self.toast = completion.toast.clone();
            if completion.reload == Reload::ActiveVehicles {
                self.load().await;
            }
        }
        outcome
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        if let Some(toast) = &self.toast {
            html.push_str(&render::render_toast(toast));
        }
        match &self.vehicles {
            LoadState::Loading => html.push_str(r#"<select name="vehicle_id" disabled></select>"#),
            LoadState::Failed(message) => html.push_str(&render::render_error_panel(message)),
            LoadState::Loaded(list) => {
                html.push_str(r#"<select name="vehicle_id"><option value="">Select a vehicle</option>"#);
                for vehicle in list {
                    let selected = self.controller.form.vehicle_id == Some(vehicle.id);
                    let _ = write!(
                        html,
                        r#"<option value="{}"{}>{}</option>"#,
                        vehicle.id,
                        if selected { " selected" } else { "" },
                        escape_html(&vehicle.label)
                    );
                }
                html.push_str("</select>");
            }
        }
        html.push_str(&render::render_modal_error(&self.controller.state));
        html
    }
}

/// Key board: signed-out table, lookup, sign-out and return.
pub struct KeysPage {
    backend: Arc<dyn FleetBackend>,
    pub signed_out: LoadState<Vec<KeyRecord>>,
    pub search: KeySearch,
    pub sign_out: SignOutController,
    pub return_key: ReturnKeyController,
}

impl KeysPage {
    pub fn new(backend: Arc<dyn FleetBackend>, search_debounce: Duration) -> Self {
        Self {
            backend,
            signed_out: LoadState::Loading,
            search: KeySearch::new(search_debounce),
            sign_out: SignOutController::new(),
            return_key: ReturnKeyController::new(),
        }
    }

    pub async fn reload_signed_out(&mut self) {
        self.signed_out = fetch("signed_out_keys_load", self.backend.signed_out_keys()).await;
    }

    /// Debouncer for the lookup box; wait on it outside any page lock.
    pub fn debouncer(&self) -> SearchDebouncer {
        self.search.debouncer().clone()
    }

    pub async fn run_search(&mut self, query: &str) -> bool {
        self.search.run(self.backend.as_ref(), query).await
    }

    pub fn open_return(&mut self, id: KeyId) -> bool {
        let key = self
            .signed_out
            .loaded()
            .and_then(|keys| keys.iter().find(|k| k.id == id));
        match key {
            Some(key) => {
                self.return_key.open(key);
                true
            }
            None => false,
        }
    }

    pub async fn submit_sign_out(&mut self) -> SubmitOutcome {
        let outcome = self.sign_out.submit(self.backend.as_ref()).await;
        self.after(&outcome).await;
        outcome
    }

    pub async fn confirm_sign_out(&mut self) -> SubmitOutcome {
        let outcome = self.sign_out.confirm(self.backend.as_ref()).await;
        self.after(&outcome).await;
        outcome
    }

    pub async fn submit_return(&mut self) -> SubmitOutcome {
        let outcome = self.return_key.submit(self.backend.as_ref()).await;
        self.after(&outcome).await;
        outcome
    }

    async fn after(&mut self, outcome: &SubmitOutcome) {
        if outcome.completion().map(|c| c.reload) == Some(Reload::SignedOutKeys) {
            self.reload_signed_out().await;
        }
    }

    pub fn render(&self) -> String {
        let mut html = match &self.signed_out {
            LoadState::Loading => r#"<div class="keys-loading">Loading keys…</div>"#.to_string(),
            LoadState::Failed(message) => render::render_error_panel(message),
            LoadState::Loaded(keys) => render::render_keys_table(keys),
        };
        if let LoadState::Loaded(results) = &self.search.results {
            if !self.search.query.trim().is_empty() {
                html.push_str(r#"<div class="key-search-results">"#);
                html.push_str(&render::render_keys_table(results));
                html.push_str("</div>");
            }
        }
        html.push_str(&render::render_modal_error(&self.sign_out.modal));
        html.push_str(&render::render_modal_error(&self.return_key.modal));
        html
    }
}

pub struct MinutesPage {
    backend: Arc<dyn FleetBackend>,
    pub minutes: LoadState<Vec<MeetingMinutes>>,
    pub editor: MinutesController,
}

impl MinutesPage {
    pub fn new(backend: Arc<dyn FleetBackend>) -> Self {
        Self {
            backend,
            minutes: LoadState::Loading,
            editor: MinutesController::new(),
        }
    }

    pub async fn load(&mut self) {
        self.minutes = fetch("meeting_minutes_load", self.backend.meeting_minutes()).await;
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.editor.submit(self.backend.as_ref()).await;
        if outcome.completion().is_some() {
            self.load().await;
        }
        outcome
    }

    pub async fn delete(&mut self, id: MinutesId) -> SubmitOutcome {
        let outcome = self.editor.delete(self.backend.as_ref(), id).await;
        if outcome.completion().is_some() {
            self.load().await;
        }
        outcome
    }

    pub fn render(&self) -> String {
        let mut html = match &self.minutes {
            LoadState::Loading => r#"<div class="minutes-loading">Loading…</div>"#.to_string(),
            LoadState::Failed(message) => render::render_error_panel(message),
            LoadState::Loaded(list) => render::render_minutes_list(list),
        };
        html.push_str(&render::render_modal_error(&self.editor.modal));
        html
    }
}
