//! Status and service write bodies for a vehicle.

use chrono::NaiveDate;
use serde::Serialize;

use fleetdesk_core::{DomainError, DomainResult};

use crate::vehicle::VehicleStatus;

/// Raw input from the status-change modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChangeForm {
    pub updated_by: String,
    pub status: VehicleStatus,
    pub notes: String,
}

/// Body of `PATCH /api/vehicles/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub updated_by: String,
    pub status: VehicleStatus,
    pub notes: Option<String>,
}

impl StatusChangeForm {
    pub fn validate(&self) -> DomainResult<StatusUpdate> {
        let updated_by = self.updated_by.trim();
        if updated_by.is_empty() {
            return Err(DomainError::validation("Updated by is required."));
        }
        let notes = self.notes.trim();
        Ok(StatusUpdate {
            updated_by: updated_by.to_string(),
            status: self.status,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Raw input from the service panel of the vehicle detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub service_status: String,
    pub service_notes: String,
    /// `YYYY-MM-DD` or blank.
    pub last_service_date: String,
}

/// Body of `PATCH /api/vehicles/{id}/service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceUpdate {
    pub service_status: String,
    pub service_notes: Option<String>,
    pub last_service_date: Option<NaiveDate>,
}

impl ServiceForm {
    pub fn validate(&self) -> DomainResult<ServiceUpdate> {
        let service_status = self.service_status.trim();
        if service_status.is_empty() {
            return Err(DomainError::validation("Service status is required."));
        }
        let last_service_date = match self.last_service_date.trim() {
            "" => None,
            raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                DomainError::validation("Last service date must be YYYY-MM-DD.")
            })?),
        };
        let notes = self.service_notes.trim();
        Ok(ServiceUpdate {
            service_status: service_status.to_string(),
            service_notes: (!notes.is_empty()).then(|| notes.to_string()),
            last_service_date,
        })
    }
}
