use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use fleetdesk_client::{ApiError, ClientConfig, FleetBackend, FleetClient, Metric};
use fleetdesk_core::{DeficiencyId, KeyId, VehicleId};
use fleetdesk_fleet::{
    DeficiencyForm, InspectionForm, KeyReturnForm, KeySignOutForm, StatusChangeForm, VehicleStatus,
};

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: &'static str,
    path: String,
    body: Value,
}

#[derive(Clone, Default)]
struct Fake {
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl Fake {
    fn record(&self, method: &'static str, path: String, body: Value) {
        self.log.lock().unwrap().push(Recorded { method, path, body });
    }

    fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(fake: Fake) -> Self {
        let app = Router::new()
            .route("/api/fleet_overview/triage", get(triage))
            .route("/api/vehicles/active", get(active))
            .route("/api/vehicles/:id", get(vehicle))
            .route("/api/vehicles/:id/status", patch(status))
            .route("/api/vehicles/:id/deficiencies", post(create_deficiency))
            .route("/api/vehicle_deficiencies/:id", patch(update_deficiency))
            .route("/api/vehicle_submissions", post(submission))
            .route("/api/keys/sign_out", post(sign_out))
            .route("/api/keys/:id/return", post(return_key))
            .route("/api/keys/search", get(search_keys))
            .route("/data-analytics/metric1", get(metric1))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn client(&self) -> FleetClient {
        FleetClient::new(&ClientConfig::new(&self.base_url).with_token("secret")).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn triage(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Query(q): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    fake.record(
        "GET",
        format!(
            "/api/fleet_overview/triage?inspection_overdue_days={}",
            q.get("inspection_overdue_days").cloned().unwrap_or_default()
        ),
        json!({ "authorization": auth }),
    );
    Json(json!({
        "vehicles": [
            { "vehicle_id": 1, "search_label": "Acme Van", "status": "DEFICIENT", "open_deficiency_count": 2 },
            { "vehicle_id": "2", "search_label": "Beta Truck", "km_remaining": "-40" },
            { "search_label": "no id" }
        ]
    }))
}

async fn active() -> impl IntoResponse {
    Json(json!([
        { "vehicle_id": 1, "search_label": "Acme Van" },
        { "id": 2, "make_model": "Ford Transit", "license_plate": "ZX-1" }
    ]))
}

async fn vehicle(Path(id): Path<i64>) -> impl IntoResponse {
    Json(json!({
        "vehicle": {
            "vehicle_id": id,
            "search_label": "Acme Van",
            "open_deficiencies": [
                { "id": 10, "description": "Mirror", "severity": "minor", "status": "OPEN" }
            ]
        }
    }))
}

async fn status(
    State(fake): State<Fake>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    fake.record("PATCH", format!("/api/vehicles/{id}/status"), body);
    match id {
        99 => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "invalid_state", "message": "Vehicle is locked" })),
        )
            .into_response(),
        409 => stale_write(),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

/// The backend answers 409 on any write that lost a race.
fn stale_write() -> axum::response::Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "Vehicle was updated by someone else" })),
    )
        .into_response()
}

async fn create_deficiency(
    State(fake): State<Fake>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    fake.record("POST", format!("/api/vehicles/{id}/deficiencies"), body);
    if id == 409 {
        return stale_write();
    }
    (StatusCode::CREATED, Json(json!({ "id": 11 }))).into_response()
}

async fn update_deficiency(
    State(fake): State<Fake>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    fake.record("PATCH", format!("/api/vehicle_deficiencies/{id}"), body);
    match id {
        409 => stale_write(),
        503 => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Database unavailable" })),
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response(),
    }
}

async fn submission(State(fake): State<Fake>, Json(body): Json<Value>) -> axum::response::Response {
    let vehicle_id = body["vehicle_id"].as_i64();
    fake.record("POST", "/api/vehicle_submissions".into(), body);
    if vehicle_id == Some(409) {
        return stale_write();
    }
    (StatusCode::CREATED, Json(json!({ "id": 501, "streak_weeks": 4 }))).into_response()
}

async fn sign_out(State(fake): State<Fake>, Json(body): Json<Value>) -> axum::response::Response {
    let forced = body["force"].as_bool().unwrap_or(false);
    fake.record("POST", "/api/keys/sign_out".into(), body);
    if forced {
        return StatusCode::NO_CONTENT.into_response();
    }
    (
        StatusCode::CONFLICT,
        Json(json!({
            "conflict": { "key_number": "K-7", "signed_out_to": "Rene" }
        })),
    )
        .into_response()
}

async fn return_key(
    State(fake): State<Fake>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.record("POST", format!("/api/keys/{id}/return"), body);
    StatusCode::NO_CONTENT
}

async fn search_keys(
    Query(q): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let needle = q.get("q").cloned().unwrap_or_default();
    Json(json!({
        "keys": [
            { "id": 7, "key_number": format!("{needle}-7"), "signed_out_to": "Rene" }
        ]
    }))
}

async fn metric1() -> impl IntoResponse {
    Json(json!({ "labels": ["Mon", "Tue"], "values": [3, 5] }))
}

#[tokio::test]
async fn triage_snapshot_is_normalized_and_authenticated() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;

    let vehicles = srv.client().triage_snapshot(10).await.unwrap();

    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].status, VehicleStatus::Deficient);
    assert_eq!(vehicles[1].id, VehicleId::new(2));
    assert_eq!(vehicles[1].km_remaining, Some(-40.0));

    let reqs = fake.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].path, "/api/fleet_overview/triage?inspection_overdue_days=10");
    assert_eq!(reqs[0].body["authorization"], "Bearer secret");
}

#[tokio::test]
async fn status_patch_sends_body_and_maps_server_message() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;
    let client = srv.client();

    let update = StatusChangeForm {
        updated_by: "Office".into(),
        status: VehicleStatus::InShop,
        notes: String::new(),
    }
    .validate()
    .unwrap();

    client
        .update_vehicle_status(VehicleId::new(5), &update)
        .await
        .unwrap();

    let err = client
        .update_vehicle_status(VehicleId::new(99), &update)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "Vehicle is locked");

    let reqs = fake.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].method, "PATCH");
    assert_eq!(
        reqs[0].body,
        json!({ "updated_by": "Office", "status": "IN_SHOP", "notes": null })
    );
}

#[tokio::test]
async fn inspection_post_returns_streak() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;

    let submission = InspectionForm {
        vehicle_id: Some(VehicleId::new(1)),
        submitted_by: "Avery".into(),
        current_km: "1000".into(),
        safe_to_operate: true,
        ..Default::default()
    }
    .validate()
    .unwrap();

    let receipt = srv.client().submit_inspection(&submission).await.unwrap();
    assert_eq!(receipt.streak_weeks, Some(4));

    let reqs = fake.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].body["vehicle_id"], 1);
    assert_eq!(reqs[0].body["submitted_by"], "Avery");
    assert_eq!(reqs[0].body["safe_to_operate"], true);
}

#[tokio::test]
async fn deficiency_writes_hit_their_endpoints() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;
    let client = srv.client();

    let draft = DeficiencyForm {
        description: "Wiper torn".into(),
        severity: "minor".into(),
        inspector_name: "Priya".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    client
        .create_deficiency(VehicleId::new(3), &draft)
        .await
        .unwrap();
    let err = client
        .update_deficiency(DeficiencyId::new(10), &draft)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Request failed (HTTP 500).");

    let reqs = fake.requests();
    assert_eq!(reqs[0].path, "/api/vehicles/3/deficiencies");
    assert_eq!(reqs[0].body["updated_by"], "Priya");
    assert_eq!(reqs[1].path, "/api/vehicle_deficiencies/10");
}

#[tokio::test]
async fn write_conflicts_outside_sign_out_show_server_text() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;
    let client = srv.client();
    let expected = ApiError::Http {
        status: 409,
        message: "Vehicle was updated by someone else".into(),
    };

    let update = StatusChangeForm {
        updated_by: "Office".into(),
        status: VehicleStatus::InShop,
        notes: String::new(),
    }
    .validate()
    .unwrap();
    let err = client
        .update_vehicle_status(VehicleId::new(409), &update)
        .await
        .unwrap_err();
    assert_eq!(err, expected);
    assert_eq!(err.user_message(), "Vehicle was updated by someone else");

    let draft = DeficiencyForm {
        description: "Wiper torn".into(),
        severity: "minor".into(),
        inspector_name: "Priya".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let err = client
        .create_deficiency(VehicleId::new(409), &draft)
        .await
        .unwrap_err();
    assert_eq!(err, expected);
    let err = client
        .update_deficiency(DeficiencyId::new(409), &draft)
        .await
        .unwrap_err();
    assert_eq!(err, expected);

    let submission = InspectionForm {
        vehicle_id: Some(VehicleId::new(409)),
        submitted_by: "Avery".into(),
        current_km: "1000".into(),
        safe_to_operate: true,
        ..Default::default()
    }
    .validate()
    .unwrap();
    let err = client.submit_inspection(&submission).await.unwrap_err();
    assert_eq!(err.user_message(), "Vehicle was updated by someone else");
    assert_eq!(err.status(), Some(409));

    assert_eq!(fake.requests().len(), 4);
}

#[tokio::test]
async fn server_error_with_error_field_only_shows_it() {
    let srv = TestServer::spawn(Fake::default()).await;
    let draft = DeficiencyForm {
        description: "Horn".into(),
        severity: "minor".into(),
        inspector_name: "Priya".into(),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let err = srv
        .client()
        .update_deficiency(DeficiencyId::new(503), &draft)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.user_message(), "Database unavailable");
}

#[tokio::test]
async fn vehicle_detail_and_active_list_unwrap_envelopes() {
    let srv = TestServer::spawn(Fake::default()).await;
    let client = srv.client();

    let vehicle = client.vehicle(VehicleId::new(4)).await.unwrap();
    assert_eq!(vehicle.id, VehicleId::new(4));
    assert_eq!(vehicle.deficiencies.len(), 1);

    let active = client.active_vehicles().await.unwrap();
    let labels: Vec<&str> = active.iter().map(|v| v.label.as_str()).collect();
    assert_eq!(labels, vec!["Acme Van", "Ford Transit (ZX-1)"]);
}

#[tokio::test]
async fn key_sign_out_conflict_then_forced() {
    let fake = Fake::default();
    let srv = TestServer::spawn(fake.clone()).await;
    let client = srv.client();

    let body = KeySignOutForm {
        key_number: "K-7".into(),
        signed_out_to: "Sam".into(),
        purpose: String::new(),
    }
    .validate()
    .unwrap();

    let err = client.sign_out_key(&body).await.unwrap_err();
    match &err {
        ApiError::Conflict { conflict, .. } => {
            assert_eq!(conflict.signed_out_to.as_deref(), Some("Rene"))
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(
        err.user_message(),
        "Key K-7 is already signed out to Rene. Sign it out anyway?"
    );

    client.sign_out_key(&body.confirmed()).await.unwrap();

    client
        .return_key(
            KeyId::new(7),
            &KeyReturnForm {
                returned_by: "Sam".into(),
            }
            .validate()
            .unwrap(),
        )
        .await
        .unwrap();

    let reqs = fake.requests();
    assert_eq!(reqs.len(), 3);
    assert_eq!(reqs[1].body["force"], true);
    assert_eq!(reqs[2].path, "/api/keys/7/return");
}

#[tokio::test]
async fn key_search_encodes_query() {
    let srv = TestServer::spawn(Fake::default()).await;
    let keys = srv.client().search_keys("K 1&2").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].key_number, "K 1&2-7");
}

#[tokio::test]
async fn metrics_are_passed_through() {
    let srv = TestServer::spawn(Fake::default()).await;
    let payload = srv
        .client()
        .metric(&Metric::data_analytics(1).unwrap())
        .await
        .unwrap();
    assert_eq!(payload["values"], json!([3, 5]));

    let missing = srv
        .client()
        .metric(&Metric::performance("weekly").unwrap())
        .await
        .unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FleetClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let err = client.triage_snapshot(7).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}
