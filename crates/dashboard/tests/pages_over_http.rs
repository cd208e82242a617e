use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};

use fleetdesk_client::{ClientConfig, FleetClient};
use fleetdesk_core::VehicleId;
use fleetdesk_dashboard::controllers::{Reload, SubmitOutcome};
use fleetdesk_dashboard::{InspectionPage, PageUpdate, TriageAction, TriagePage};
use fleetdesk_fleet::{OverduePolicy, VehicleStatus};

#[derive(Clone, Default)]
struct Fake {
    log: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Fake {
    fn record(&self, line: String, body: Value) {
        self.log.lock().unwrap().push((line, body));
    }

    fn lines(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(l, _)| l.clone()).collect()
    }

    fn body_of(&self, line: &str) -> Option<Value> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| l == line)
            .map(|(_, b)| b.clone())
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
            .route("/api/vehicles/:id/status", patch(status))
            .route("/api/vehicle_submissions", post(submission))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url, handle }
    }

    fn client(&self) -> Arc<FleetClient> {
        Arc::new(FleetClient::new(&ClientConfig::new(&self.base_url)).unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn triage(State(fake): State<Fake>) -> Json<Value> {
    fake.record("GET triage".into(), Value::Null);
    let deficiencies: Vec<Value> = (1..=5)
        .map(|n| json!({ "id": n, "description": format!("Defect {n}"), "severity": "HIGH", "status": "OPEN" }))
        .collect();
    Json(json!([
        {
            "vehicle_id": 1,
            "label": "Acme Van",
            "status": "DEFICIENT",
            "last_submission_at": Utc::now().to_rfc3339(),
            "deficiencies": deficiencies,
        },
        { "vehicle_id": 2, "label": "Beta Truck", "status": "OK", "km_remaining": "-20" }
    ]))
}

async fn active(State(fake): State<Fake>) -> Json<Value> {
    fake.record("GET active".into(), Value::Null);
    Json(json!({ "vehicles": [{ "vehicle_id": 1, "label": "Acme Van" }, { "id": 2, "label": "Beta Truck" }] }))
}

async fn status(
    State(fake): State<Fake>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.record(format!("PATCH status {id}"), body);
    StatusCode::NO_CONTENT
}

async fn submission(State(fake): State<Fake>, Json(body): Json<Value>) -> Json<Value> {
    fake.record("POST submission".into(), body);
    Json(json!({ "id": 501, "streak": 2 }))
}

#[tokio::test]
async fn triage_page_renders_live_snapshot() {
    let fake = Fake::default();
    let server = TestServer::spawn(fake.clone()).await;
    let mut page = TriagePage::new(server.client(), OverduePolicy::default());
    page.load().await;

    let counts = page.view().counts(Utc::now());
    assert_eq!(counts.total, 2);
    assert_eq!(counts.open_defs, 1);
    assert_eq!(counts.km_overdue, 1);

    let update = page
        .dispatch(TriageAction::ToggleRow(VehicleId::new(1)), Utc::now())
        .await;
    match update {
        PageUpdate::Patch(patch) => assert!(patch.html.contains("Show all 5 deficiencies")),
        other => panic!("expected a row patch, got {other:?}"),
    }

    let update = page
        .dispatch(TriageAction::SetSearch("beta".into()), Utc::now())
        .await;
    match update {
        PageUpdate::Full(html) => {
            assert!(html.contains("Beta Truck"));
            assert!(!html.contains("Acme Van"));
        }
        other => panic!("expected a full render, got {other:?}"),
    }
    assert_eq!(fake.lines(), vec!["GET triage"]);
}

#[tokio::test]
async fn status_change_validates_then_patches_and_reloads() {
    let fake = Fake::default();
    let server = TestServer::spawn(fake.clone()).await;
    let mut page = TriagePage::new(server.client(), OverduePolicy::default());
    page.load().await;

    assert!(page.open_status(VehicleId::new(2)));
    page.status.form.status = VehicleStatus::Booked;
    let outcome = page.submit_status().await;
    assert_eq!(outcome, SubmitOutcome::Rejected("Updated by is required.".into()));
    assert_eq!(fake.lines(), vec!["GET triage"]);

    page.status.form.updated_by = "Dana".into();
    let outcome = page.submit_status().await;
    assert_eq!(outcome.completion().map(|c| c.reload), Some(Reload::Snapshot));
    assert_eq!(fake.lines(), vec!["GET triage", "PATCH status 2", "GET triage"]);
    assert_eq!(
        fake.body_of("PATCH status 2"),
        Some(json!({ "updated_by": "Dana", "status": "BOOKED", "notes": null }))
    );
}

#[tokio::test]
async fn inspection_round_trip_over_http() {
    let fake = Fake::default();
    let server = TestServer::spawn(fake.clone()).await;
    let mut page = InspectionPage::new(server.client());
    page.load().await;

    assert!(page.select_vehicle(VehicleId::new(2)));
    page.controller.form.submitted_by = "Priya".into();
    page.controller.form.current_km = "15,020".into();
    page.controller.form.safe_to_operate = true;
    let outcome = page.submit().await;
    assert!(outcome.completion().is_some());

    assert_eq!(fake.lines(), vec!["GET active", "POST submission", "GET active"]);
    let body = fake.body_of("POST submission").unwrap();
    assert_eq!(body["vehicle_id"], 2);
    assert_eq!(body["submitted_by"], "Priya");
    assert_eq!(body["current_km"], 15020.0);
    assert_eq!(body["safe_to_operate"], true);

    let toast = page.toast.clone().unwrap();
    assert_eq!(toast.detail.as_deref(), Some("2 weeks in a row on time. Nice!"));
}

#[tokio::test]
async fn unreachable_backend_shows_error_panel() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Arc::new(FleetClient::new(&ClientConfig::new(format!("http://{addr}"))).unwrap());
    let mut page = TriagePage::new(client, OverduePolicy::default());
    page.load().await;

    let html = page.render(Utc::now());
    assert!(html.contains("error-panel"));
    assert!(html.contains("Network error."));
    assert!(html.contains("0 vehicles"));
}
