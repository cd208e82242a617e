//! In-memory backend for controller and page tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use fleetdesk_client::{ApiError, ApiResult, FleetBackend, Metric};
use fleetdesk_core::{DeficiencyId, KeyId, MinutesId, VehicleId};
use fleetdesk_fleet::{
    ActiveVehicle, Deficiency, DeficiencyDraft, DeficiencyStatus, InspectionSubmission,
    KeyConflict, KeyRecord, KeyReturn, KeySignOut, MeetingMinutes, MinutesDraft, ServiceUpdate,
    StatusUpdate, SubmissionReceipt, Vehicle,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Snapshot(u32),
    Status(VehicleId, StatusUpdate),
    ActiveVehicles,
    Vehicle(VehicleId),
    Service(VehicleId, ServiceUpdate),
    Inspection(InspectionSubmission),
    CreateDeficiency(VehicleId, DeficiencyDraft),
    UpdateDeficiency(DeficiencyId, DeficiencyDraft),
    Metric(Metric),
    SignedOutKeys,
    SearchKeys(String),
    SignOut(KeySignOut),
    ReturnKey(KeyId, KeyReturn),
    Minutes,
    CreateMinutes(MinutesDraft),
    UpdateMinutes(MinutesId, MinutesDraft),
    DeleteMinutes(MinutesId),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub vehicles: Vec<Vehicle>,
    pub keys: Vec<KeyRecord>,
    pub minutes: Vec<MeetingMinutes>,
    pub streak_weeks: Option<u32>,
    /// Current holder per key number; sign-out without `force` conflicts.
    pub held_keys: Vec<(String, String)>,
    /// Returned (once) by the next call.
    pub next_error: Option<ApiError>,
    pub calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().vehicles = vehicles;
        fake
    }

    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().unwrap().next_error = Some(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.next_error.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    fn find_vehicle(state: &FakeState, id: VehicleId) -> ApiResult<Vehicle> {
        state
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(ApiError::Http {
                status: 404,
                message: "Vehicle not found".into(),
            })
    }
}

pub fn vehicle(id: i64, label: &str) -> Vehicle {
    Vehicle::new(VehicleId::new(id), label)
}

pub fn open_deficiency(id: i64, description: &str) -> Deficiency {
    Deficiency {
        id: Some(DeficiencyId::new(id)),
        description: description.into(),
        severity: "HIGH".into(),
        status: DeficiencyStatus::Open,
        updated_by: None,
        updated_at: None,
    }
}

#[async_trait]
impl FleetBackend for FakeBackend {
    async fn triage_snapshot(&self, days: u32) -> ApiResult<Vec<Vehicle>> {
        Ok(self.record(Call::Snapshot(days))?.vehicles.clone())
    }

    async fn update_vehicle_status(&self, id: VehicleId, update: &StatusUpdate) -> ApiResult<()> {
        let mut state = self.record(Call::Status(id, update.clone()))?;
        if let Some(v) = state.vehicles.iter_mut().find(|v| v.id == id) {
            v.status = update.status;
        }
        Ok(())
    }

    async fn active_vehicles(&self) -> ApiResult<Vec<ActiveVehicle>> {
        let state = self.record(Call::ActiveVehicles)?;
        Ok(state.vehicles.iter().map(ActiveVehicle::from).collect())
    }

    async fn vehicle(&self, id: VehicleId) -> ApiResult<Vehicle> {
        let state = self.record(Call::Vehicle(id))?;
        Self::find_vehicle(&state, id)
    }

    async fn update_vehicle_service(&self, id: VehicleId, update: &ServiceUpdate) -> ApiResult<()> {
        let state = self.record(Call::Service(id, update.clone()))?;
        Self::find_vehicle(&state, id).map(|_| ())
    }

    async fn submit_inspection(
        &self,
        submission: &InspectionSubmission,
    ) -> ApiResult<SubmissionReceipt> {
        let state = self.record(Call::Inspection(submission.clone()))?;
        Ok(SubmissionReceipt {
            id: None,
            streak_weeks: state.streak_weeks,
        })
    }

    async fn create_deficiency(
        &self,
        vehicle_id: VehicleId,
        draft: &DeficiencyDraft,
    ) -> ApiResult<()> {
        let mut state = self.record(Call::CreateDeficiency(vehicle_id, draft.clone()))?;
        let next_id = state
            .vehicles
            .iter()
            .flat_map(|v| v.deficiencies.iter().filter_map(|d| d.id))
            .map(|id| id.get())
            .max()
            .unwrap_or(0)
            + 1;
        let vehicle = state
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .ok_or(ApiError::Http {
                status: 404,
                message: "Vehicle not found".into(),
            })?;
        vehicle
            .deficiencies
            .push(open_deficiency(next_id, &draft.description));
        vehicle.open_deficiency_count += 1;
        Ok(())
    }

    async fn update_deficiency(&self, id: DeficiencyId, draft: &DeficiencyDraft) -> ApiResult<()> {
        let mut state = self.record(Call::UpdateDeficiency(id, draft.clone()))?;
        for vehicle in &mut state.vehicles {
            for deficiency in &mut vehicle.deficiencies {
                if deficiency.id == Some(id) {
                    deficiency.description = draft.description.clone();
                    deficiency.severity = draft.severity.clone();
                    if let Some(status) = &draft.status {
                        deficiency.status = status.clone();
                    }
                }
            }
        }
        Ok(())
    }

    async fn metric(&self, metric: &Metric) -> ApiResult<Value> {
        self.record(Call::Metric(metric.clone()))?;
        Ok(json!({ "labels": [], "values": [] }))
    }

    async fn signed_out_keys(&self) -> ApiResult<Vec<KeyRecord>> {
        let state = self.record(Call::SignedOutKeys)?;
        Ok(state.keys.iter().filter(|k| k.is_signed_out()).cloned().collect())
    }

    async fn search_keys(&self, query: &str) -> ApiResult<Vec<KeyRecord>> {
        let state = self.record(Call::SearchKeys(query.to_string()))?;
        let needle = query.to_lowercase();
        Ok(state
            .keys
            .iter()
            .filter(|k| k.key_number.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn sign_out_key(&self, sign_out: &KeySignOut) -> ApiResult<()> {
        let mut state = self.record(Call::SignOut(sign_out.clone()))?;
        let holder = state
            .held_keys
            .iter()
            .find(|(key, _)| *key == sign_out.key_number)
            .map(|(_, holder)| holder.clone());
        if let (Some(holder), false) = (holder, sign_out.force) {
            let conflict = KeyConflict {
                key_number: Some(sign_out.key_number.clone()),
                signed_out_to: Some(holder),
                signed_out_at: None,
            };
            return Err(ApiError::Conflict {
                message: conflict.prompt(),
                conflict,
            });
        }
        state.held_keys.retain(|(key, _)| *key != sign_out.key_number);
        state
            .held_keys
            .push((sign_out.key_number.clone(), sign_out.signed_out_to.clone()));
        Ok(())
    }

    async fn return_key(&self, id: KeyId, body: &KeyReturn) -> ApiResult<()> {
        let mut state = self.record(Call::ReturnKey(id, body.clone()))?;
        state.keys.retain(|k| k.id != id);
        Ok(())
    }

    async fn meeting_minutes(&self) -> ApiResult<Vec<MeetingMinutes>> {
        Ok(self.record(Call::Minutes)?.minutes.clone())
    }

    async fn create_meeting_minutes(&self, draft: &MinutesDraft) -> ApiResult<MeetingMinutes> {
        let mut state = self.record(Call::CreateMinutes(draft.clone()))?;
        let id = MinutesId::new(state.minutes.len() as i64 + 1);
        let created = MeetingMinutes {
            id,
            title: draft.title.clone(),
            held_on: draft.held_on,
            attendees: draft.attendees.clone(),
            body: draft.body.clone(),
        };
        state.minutes.push(created.clone());
        Ok(created)
    }

    async fn update_meeting_minutes(
        &self,
        id: MinutesId,
        draft: &MinutesDraft,
    ) -> ApiResult<MeetingMinutes> {
        let mut state = self.record(Call::UpdateMinutes(id, draft.clone()))?;
        let entry = state
            .minutes
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ApiError::Http {
                status: 404,
                message: "Not found".into(),
            })?;
        entry.title = draft.title.clone();
        entry.held_on = draft.held_on;
        entry.attendees = draft.attendees.clone();
        entry.body = draft.body.clone();
        Ok(entry.clone())
    }

    async fn delete_meeting_minutes(&self, id: MinutesId) -> ApiResult<()> {
        let mut state = self.record(Call::DeleteMinutes(id))?;
        state.minutes.retain(|m| m.id != id);
        Ok(())
    }
}
