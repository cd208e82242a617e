//! Vehicle view-model and boundary normalization.
//!
//! Backend rows are loosely shaped: every field is optional and several come
//! under more than one key. [`Vehicle::from_json`] is the single place where
//! that shape is resolved. Fallback order (first present wins):
//!
//! | field                   | keys                                                 |
//! |-------------------------|------------------------------------------------------|
//! | `id`                    | `vehicle_id`, `id` (required)                        |
//! | `make_model`            | `make_model`, then `"{make} {model}"`                |
//! | `license_plate`         | `license_plate`, `plate`                             |
//! | `label`                 | `search_label`, `label` (empty when both missing)    |
//! | `driver_name`           | `assigned_driver`, `driver_name`                     |
//! | `status`                | `status` (absent or unknown ⇒ `OK`)                  |
//! | `current_km`            | `latest_current_km`, `current_km`                    |
//! | `service_due_km`        | `latest_service_due_km`, `service_due_km`            |
//! | `km_remaining`          | `km_remaining`                                       |
//! | `last_submission_at`    | `last_submission_at`, `last_inspection_at`           |
//! | `office_notes`          | `office_notes`, `notes`                              |
//! | `deficiencies`          | `open_deficiencies`, `deficiencies` (open rows only) |
//! | `open_deficiency_count` | `open_deficiency_count`, else `deficiencies.len()`   |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fleetdesk_core::{DomainError, DomainResult, VehicleId};

use crate::deficiency::Deficiency;
use crate::fields::Fields;

/// Operational status of a vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Ok,
    Due,
    Deficient,
    Booked,
    InShop,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 5] = [
        VehicleStatus::Ok,
        VehicleStatus::Due,
        VehicleStatus::Deficient,
        VehicleStatus::Booked,
        VehicleStatus::InShop,
    ];

    /// Case-insensitive; spaces and dashes count as underscores.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "OK" => Some(Self::Ok),
            "DUE" => Some(Self::Due),
            "DEFICIENT" => Some(Self::Deficient),
            "BOOKED" => Some(Self::Booked),
            "IN_SHOP" => Some(Self::InShop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Due => "DUE",
            Self::Deficient => "DEFICIENT",
            Self::Booked => "BOOKED",
            Self::InShop => "IN_SHOP",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Due => "Due",
            Self::Deficient => "Deficient",
            Self::Booked => "Booked",
            Self::InShop => "In shop",
        }
    }

    /// Triage priority; higher sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::InShop => 50,
            Self::Deficient => 40,
            Self::Booked => 30,
            Self::Due => 20,
            Self::Ok => 10,
        }
    }
}

impl core::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only projection of a vehicle from the triage snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make_model: Option<String>,
    pub license_plate: Option<String>,
    /// Search/sort label; may be empty.
    pub label: String,
    pub driver_name: Option<String>,
    pub status: VehicleStatus,
    pub current_km: Option<f64>,
    pub service_due_km: Option<f64>,
    pub km_remaining: Option<f64>,
    pub last_submission_at: Option<DateTime<Utc>>,
    pub last_submission_by: Option<String>,
    /// Precomputed by the backend when present.
    pub inspection_is_overdue: Option<bool>,
    pub office_notes: Option<String>,
    pub deficiencies: Vec<Deficiency>,
    pub open_deficiency_count: u32,
}

impl Vehicle {
    /// A vehicle with only identity set; every other field empty/default.
    pub fn new(id: VehicleId, label: impl Into<String>) -> Self {
        Self {
            id,
            make_model: None,
            license_plate: None,
            label: label.into(),
            driver_name: None,
            status: VehicleStatus::Ok,
            current_km: None,
            service_due_km: None,
            km_remaining: None,
            last_submission_at: None,
            last_submission_by: None,
            inspection_is_overdue: None,
            office_notes: None,
            deficiencies: Vec::new(),
            open_deficiency_count: 0,
        }
    }

    pub fn from_json(value: &Value) -> DomainResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| DomainError::validation("vehicle row is not an object"))?;
        let f = Fields::new(map);

        let id = f
            .integer(&["vehicle_id", "id"])
            .map(VehicleId::new)
            .ok_or_else(|| DomainError::invalid_id("vehicle row has no vehicle_id"))?;

        let make_model = f.string(&["make_model"]).or_else(|| {
            match (f.string(&["make"]), f.string(&["model"])) {
                (Some(make), Some(model)) => Some(format!("{make} {model}")),
                (make, model) => make.or(model),
            }
        });

        let deficiencies: Vec<Deficiency> = f
            .array(&["open_deficiencies", "deficiencies"])
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| match Deficiency::from_json(row) {
                        Ok(def) => Some(def),
                        Err(err) => {
                            tracing::warn!(vehicle_id = %id, error = %err, "dropping malformed deficiency row");
                            None
                        }
                    })
                    .filter(Deficiency::is_open)
                    .collect()
            })
            .unwrap_or_default();

        let open_deficiency_count = f
            .integer(&["open_deficiency_count"])
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .unwrap_or_else(|| u32::try_from(deficiencies.len()).unwrap_or(u32::MAX));

        Ok(Self {
            id,
            make_model,
            license_plate: f.string(&["license_plate", "plate"]),
            label: f.string(&["search_label", "label"]).unwrap_or_default(),
            driver_name: f.string(&["assigned_driver", "driver_name"]),
            status: f
                .string(&["status"])
                .and_then(|s| VehicleStatus::parse(&s))
                .unwrap_or_default(),
            current_km: f.number(&["latest_current_km", "current_km"]),
            service_due_km: f.number(&["latest_service_due_km", "service_due_km"]),
            km_remaining: f.number(&["km_remaining"]),
            last_submission_at: f.timestamp(&["last_submission_at", "last_inspection_at"]),
            last_submission_by: f.string(&["last_submission_by"]),
            inspection_is_overdue: f.boolean(&["inspection_is_overdue"]),
            office_notes: f.string(&["office_notes", "notes"]),
            deficiencies,
            open_deficiency_count,
        })
    }

    /// Label for display: the search label, else make/model and plate, else
    /// `Vehicle {id}`.
    pub fn display_label(&self) -> String {
        if !self.label.is_empty() {
            return self.label.clone();
        }
        match (&self.make_model, &self.license_plate) {
            (Some(mm), Some(plate)) => format!("{mm} ({plate})"),
            (Some(mm), None) => mm.clone(),
            (None, Some(plate)) => plate.clone(),
            (None, None) => format!("Vehicle {}", self.id),
        }
    }

    /// Lower-cased haystack for free-text search.
    pub fn search_text(&self) -> String {
        [
            self.driver_name.as_deref(),
            self.make_model.as_deref(),
            self.license_plate.as_deref(),
            Some(self.label.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

/// Normalize a triage snapshot payload.
///
/// Accepts a bare array or an object carrying the array under `vehicles`.
/// Rows that cannot be normalized (no id, not an object) are dropped and
/// logged; the rest of the snapshot is kept.
pub fn normalize_snapshot(payload: &Value) -> DomainResult<Vec<Vehicle>> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(map) => map
            .get("vehicles")
            .and_then(Value::as_array)
            .ok_or_else(|| DomainError::validation("snapshot has no vehicles array"))?,
        _ => return Err(DomainError::validation("snapshot is not an array")),
    };

    Ok(rows
        .iter()
        .filter_map(|row| match Vehicle::from_json(row) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed vehicle row");
                None
            }
        })
        .collect())
}

/// Entry of the inspection form's vehicle picker (`GET /api/vehicles/active`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveVehicle {
    pub id: VehicleId,
    pub label: String,
}

impl From<&Vehicle> for ActiveVehicle {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            label: vehicle.display_label(),
        }
    }
}

impl ActiveVehicle {
    pub fn list_from_json(payload: &Value) -> DomainResult<Vec<Self>> {
        Ok(normalize_snapshot(payload)?.iter().map(Self::from).collect())
    }
}
