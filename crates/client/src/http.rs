//! HTTP implementation of [`FleetBackend`] over `reqwest`.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use fleetdesk_core::{DeficiencyId, KeyId, MinutesId, VehicleId};
use fleetdesk_fleet::{
    ActiveVehicle, DeficiencyDraft, InspectionSubmission, KeyConflict, KeyRecord, KeyReturn,
    KeySignOut, MeetingMinutes, MinutesDraft, ServiceUpdate, StatusUpdate, SubmissionReceipt,
    Vehicle, normalize_snapshot,
};

use crate::analytics::Metric;
use crate::backend::FleetBackend;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, message_from_body};

/// Client for the fleet backend REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl FleetClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        let mut req = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send and classify. Returns the parsed JSON body (`Null` when empty).
    async fn execute(&self, req: RequestBuilder) -> ApiResult<Value> {
        self.execute_with(req, ApiError::from_response).await
    }

    /// Like [`execute`](Self::execute), with a caller-chosen mapping for
    /// non-2xx responses.
    async fn execute_with(
        &self,
        req: RequestBuilder,
        classify: fn(u16, &str) -> ApiError,
    ) -> ApiResult<Value> {
        let resp = req
            .send()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "request failed before a response"))?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend returned an error status");
            return Err(classify(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get(&self, path: &str) -> ApiResult<Value> {
        tracing::debug!(path, "GET");
        self.execute(self.request(Method::GET, path)).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Value> {
        tracing::debug!(%method, path, "write");
        self.execute(self.request(method, path).json(body)).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// List endpoints answer with a bare array or `{ "<key>": [...] }`.
fn list_payload(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

/// Single-record endpoints answer with the record or `{ "<key>": {...} }`.
fn record_payload(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.get(key).is_some_and(Value::is_object) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Sign-out is the only endpoint whose 409 carries a key holder.
fn classify_sign_out(status: u16, body: &str) -> ApiError {
    if status == StatusCode::CONFLICT.as_u16() {
        conflict_from_body(body)
    } else {
        ApiError::from_response(status, body)
    }
}

fn conflict_from_body(body: &str) -> ApiError {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let conflict = value
        .get("conflict")
        .cloned()
        .or_else(|| value.is_object().then(|| value.clone()))
        .and_then(|v| serde_json::from_value::<KeyConflict>(v).ok())
        .unwrap_or_default();
    let message = message_from_body(body).unwrap_or_else(|| conflict.prompt());
    ApiError::Conflict { message, conflict }
}

#[async_trait]
impl FleetBackend for FleetClient {
    async fn triage_snapshot(&self, inspection_overdue_days: u32) -> ApiResult<Vec<Vehicle>> {
        let path = format!(
            "/api/fleet_overview/triage?inspection_overdue_days={inspection_overdue_days}"
        );
        let payload = self.get(&path).await?;
        let vehicles = normalize_snapshot(&payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::info!(count = vehicles.len(), inspection_overdue_days, "triage snapshot loaded");
        Ok(vehicles)
    }

    async fn update_vehicle_status(&self, id: VehicleId, update: &StatusUpdate) -> ApiResult<()> {
        let path = format!("/api/vehicles/{id}/status");
        self.send_json(Method::PATCH, &path, update).await?;
        tracing::info!(vehicle_id = %id, status = %update.status, "vehicle status updated");
        Ok(())
    }

    async fn active_vehicles(&self) -> ApiResult<Vec<ActiveVehicle>> {
        let payload = list_payload(self.get("/api/vehicles/active").await?, "vehicles");
        ActiveVehicle::list_from_json(&payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn vehicle(&self, id: VehicleId) -> ApiResult<Vehicle> {
        let payload = record_payload(self.get(&format!("/api/vehicles/{id}")).await?, "vehicle");
        Vehicle::from_json(&payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_vehicle_service(&self, id: VehicleId, update: &ServiceUpdate) -> ApiResult<()> {
        let path = format!("/api/vehicles/{id}/service");
        self.send_json(Method::PATCH, &path, update).await?;
        tracing::info!(vehicle_id = %id, "vehicle service updated");
        Ok(())
    }

    async fn submit_inspection(
        &self,
        submission: &InspectionSubmission,
    ) -> ApiResult<SubmissionReceipt> {
        let path = "/api/vehicle_submissions";
        let payload = self.send_json(Method::POST, path, submission).await?;
        tracing::info!(vehicle_id = %submission.vehicle_id, "inspection submitted");
        if payload.is_null() {
            return Ok(SubmissionReceipt::default());
        }
        decode(payload)
    }

    async fn create_deficiency(
        &self,
        vehicle_id: VehicleId,
        draft: &DeficiencyDraft,
    ) -> ApiResult<()> {
        self.send_json(
            Method::POST,
            &format!("/api/vehicles/{vehicle_id}/deficiencies"),
            draft,
        )
        .await?;
        tracing::info!(vehicle_id = %vehicle_id, "deficiency created");
        Ok(())
    }

    async fn update_deficiency(&self, id: DeficiencyId, draft: &DeficiencyDraft) -> ApiResult<()> {
        let path = format!("/api/vehicle_deficiencies/{id}");
        self.send_json(Method::PATCH, &path, draft).await?;
        tracing::info!(deficiency_id = %id, "deficiency updated");
        Ok(())
    }

    async fn metric(&self, metric: &Metric) -> ApiResult<Value> {
        self.get(&metric.path()).await
    }

    async fn signed_out_keys(&self) -> ApiResult<Vec<KeyRecord>> {
        decode(list_payload(self.get("/api/keys/signed_out").await?, "keys"))
    }

    async fn search_keys(&self, query: &str) -> ApiResult<Vec<KeyRecord>> {
        let req = self
            .request(Method::GET, "/api/keys/search")
            .query(&[("q", query)]);
        decode(list_payload(self.execute(req).await?, "keys"))
    }

    async fn sign_out_key(&self, sign_out: &KeySignOut) -> ApiResult<()> {
        let req = self
            .request(Method::POST, "/api/keys/sign_out")
            .json(sign_out);
        self.execute_with(req, classify_sign_out).await?;
        tracing::info!(key_number = %sign_out.key_number, forced = sign_out.force, "key signed out");
        Ok(())
    }

    async fn return_key(&self, id: KeyId, body: &KeyReturn) -> ApiResult<()> {
        let path = format!("/api/keys/{id}/return");
        self.send_json(Method::POST, &path, body).await?;
        tracing::info!(key_id = %id, "key returned");
        Ok(())
    }

    async fn meeting_minutes(&self) -> ApiResult<Vec<MeetingMinutes>> {
        decode(list_payload(
            self.get("/api/meeting_minutes").await?,
            "meeting_minutes",
        ))
    }

    async fn create_meeting_minutes(&self, draft: &MinutesDraft) -> ApiResult<MeetingMinutes> {
        decode(record_payload(
            self.send_json(Method::POST, "/api/meeting_minutes", draft).await?,
            "meeting_minutes",
        ))
    }

    async fn update_meeting_minutes(
        &self,
        id: MinutesId,
        draft: &MinutesDraft,
    ) -> ApiResult<MeetingMinutes> {
        let path = format!("/api/meeting_minutes/{id}");
        decode(record_payload(
            self.send_json(Method::PATCH, &path, draft).await?,
            "meeting_minutes",
        ))
    }

    async fn delete_meeting_minutes(&self, id: MinutesId) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/api/meeting_minutes/{id}")))
            .await?;
        Ok(())
    }
}
