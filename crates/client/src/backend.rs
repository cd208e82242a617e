//! The seam between controllers and the fleet backend.

use async_trait::async_trait;
use serde_json::Value;

use fleetdesk_core::{DeficiencyId, KeyId, MinutesId, VehicleId};
use fleetdesk_fleet::{
    ActiveVehicle, DeficiencyDraft, InspectionSubmission, KeyRecord, KeyReturn, KeySignOut,
    MeetingMinutes, MinutesDraft, ServiceUpdate, StatusUpdate, SubmissionReceipt, Vehicle,
};

use crate::analytics::Metric;
use crate::error::ApiResult;

/// Every backend operation the dashboard uses.
///
/// Implemented over HTTP by [`crate::FleetClient`]; tests substitute an
/// in-memory fake. Implementations must not retry or cache.
#[async_trait]
pub trait FleetBackend: Send + Sync {
    /// `GET /api/fleet_overview/triage?inspection_overdue_days=N`
    async fn triage_snapshot(&self, inspection_overdue_days: u32) -> ApiResult<Vec<Vehicle>>;

    /// `PATCH /api/vehicles/{id}/status`
    async fn update_vehicle_status(&self, id: VehicleId, update: &StatusUpdate) -> ApiResult<()>;

    /// `GET /api/vehicles/active`
    async fn active_vehicles(&self) -> ApiResult<Vec<ActiveVehicle>>;

    /// `GET /api/vehicles/{id}`
    async fn vehicle(&self, id: VehicleId) -> ApiResult<Vehicle>;

    /// `PATCH /api/vehicles/{id}/service`
    async fn update_vehicle_service(&self, id: VehicleId, update: &ServiceUpdate) -> ApiResult<()>;

    /// `POST /api/vehicle_submissions`
    async fn submit_inspection(
        &self,
        submission: &InspectionSubmission,
    ) -> ApiResult<SubmissionReceipt>;

    /// `POST /api/vehicles/{id}/deficiencies`
    async fn create_deficiency(&self, vehicle_id: VehicleId, draft: &DeficiencyDraft)
    -> ApiResult<()>;

    /// `PATCH /api/vehicle_deficiencies/{id}`
    async fn update_deficiency(&self, id: DeficiencyId, draft: &DeficiencyDraft) -> ApiResult<()>;

    async fn metric(&self, metric: &Metric) -> ApiResult<Value>;

    /// `GET /api/keys/signed_out`
    async fn signed_out_keys(&self) -> ApiResult<Vec<KeyRecord>>;

    /// `GET /api/keys/search?q=`
    async fn search_keys(&self, query: &str) -> ApiResult<Vec<KeyRecord>>;

    /// `POST /api/keys/sign_out`. A collision surfaces as `ApiError::Conflict`.
    async fn sign_out_key(&self, sign_out: &KeySignOut) -> ApiResult<()>;

    /// `POST /api/keys/{id}/return`
    async fn return_key(&self, id: KeyId, body: &KeyReturn) -> ApiResult<()>;

    /// `GET /api/meeting_minutes`
    async fn meeting_minutes(&self) -> ApiResult<Vec<MeetingMinutes>>;

    /// `POST /api/meeting_minutes`
    async fn create_meeting_minutes(&self, draft: &MinutesDraft) -> ApiResult<MeetingMinutes>;

    /// `PATCH /api/meeting_minutes/{id}`
    async fn update_meeting_minutes(
        &self,
        id: MinutesId,
        draft: &MinutesDraft,
    ) -> ApiResult<MeetingMinutes>;

    /// `DELETE /api/meeting_minutes/{id}`
    async fn delete_meeting_minutes(&self, id: MinutesId) -> ApiResult<()>;
}
