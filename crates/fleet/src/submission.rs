//! Weekly vehicle inspection submission.

use serde::{Deserialize, Serialize};

use fleetdesk_core::{DomainError, DomainResult, SubmissionId, VehicleId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluidLevel {
    Ok,
    Low,
    Empty,
}

impl FluidLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ok" | "full" | "good" => Some(Self::Ok),
            "low" => Some(Self::Low),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

/// Raw inspection form input, as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionForm {
    pub vehicle_id: Option<VehicleId>,
    pub submitted_by: String,
    pub current_km: String,
    pub service_due_km: String,
    pub oil_level: Option<FluidLevel>,
    pub coolant_level: Option<FluidLevel>,
    pub transmission_level: Option<FluidLevel>,
    pub warning_lights: bool,
    pub safe_to_operate: bool,
    pub notes: String,
}

/// Validated POST body for `/api/vehicle_submissions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionSubmission {
    pub vehicle_id: VehicleId,
    pub submitted_by: String,
    pub current_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_due_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oil_level: Option<FluidLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coolant_level: Option<FluidLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_level: Option<FluidLevel>,
    pub warning_lights: bool,
    pub safe_to_operate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InspectionForm {
    /// Client-side gate in front of the POST. Checks run in form order so the
    /// first problem the operator sees is the topmost field.
    pub fn validate(&self) -> DomainResult<InspectionSubmission> {
        let vehicle_id = self
            .vehicle_id
            .ok_or_else(|| DomainError::validation("Please select a vehicle."))?;

        let submitted_by = self.submitted_by.trim();
        if submitted_by.is_empty() {
            return Err(DomainError::validation("Submitted by is required."));
        }

        let current_km = parse_km(&self.current_km)
            .ok_or_else(|| DomainError::validation("Current km must be a number 0 or greater."))?;

        let service_due_km = if self.service_due_km.trim().is_empty() {
            None
        } else {
            Some(parse_km(&self.service_due_km).ok_or_else(|| {
                DomainError::validation("Service due km must be a number 0 or greater.")
            })?)
        };

        let notes = self.notes.trim();
        Ok(InspectionSubmission {
            vehicle_id,
            submitted_by: submitted_by.to_string(),
            current_km,
            service_due_km,
            oil_level: self.oil_level,
            coolant_level: self.coolant_level,
            transmission_level: self.transmission_level,
            warning_lights: self.warning_lights,
            safe_to_operate: self.safe_to_operate,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

fn parse_km(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|km| km.is_finite() && *km >= 0.0)
}

/// Backend acknowledgement of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub id: Option<SubmissionId>,
    /// Consecutive on-time weeks, computed server-side.
    #[serde(default, alias = "streak")]
    pub streak_weeks: Option<u32>,
}
