//! Vehicle key check-in / check-out records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetdesk_core::format::format_timestamp;
use fleetdesk_core::{DomainError, DomainResult, KeyId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub id: KeyId,
    pub key_number: String,
    #[serde(default)]
    pub vehicle_label: Option<String>,
    #[serde(default)]
    pub signed_out_to: Option<String>,
    #[serde(default)]
    pub signed_out_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
}

impl KeyRecord {
    pub fn is_signed_out(&self) -> bool {
        self.signed_out_to.is_some() && self.returned_at.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySignOutForm {
    pub key_number: String,
    pub signed_out_to: String,
    pub purpose: String,
}

/// Body of `POST /api/keys/sign_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySignOut {
    pub key_number: String,
    pub signed_out_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Set only after the operator confirmed a conflict.
    pub force: bool,
}

impl KeySignOut {
    pub fn confirmed(mut self) -> Self {
        self.force = true;
        self
    }
}

impl KeySignOutForm {
    pub fn validate(&self) -> DomainResult<KeySignOut> {
        let key_number = self.key_number.trim();
        if key_number.is_empty() {
            return Err(DomainError::validation("Key number is required."));
        }
        let signed_out_to = self.signed_out_to.trim();
        if signed_out_to.is_empty() {
            return Err(DomainError::validation("Signed out to is required."));
        }
        let purpose = self.purpose.trim();
        Ok(KeySignOut {
            key_number: key_number.to_string(),
            signed_out_to: signed_out_to.to_string(),
            purpose: (!purpose.is_empty()).then(|| purpose.to_string()),
            force: false,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyReturnForm {
    pub returned_by: String,
}

/// Body of `POST /api/keys/{id}/return`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyReturn {
    pub returned_by: String,
}

impl KeyReturnForm {
    pub fn validate(&self) -> DomainResult<KeyReturn> {
        let returned_by = self.returned_by.trim();
        if returned_by.is_empty() {
            return Err(DomainError::validation("Returned by is required."));
        }
        Ok(KeyReturn {
            returned_by: returned_by.to_string(),
        })
    }
}

/// Current holder reported by the backend when a sign-out collides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConflict {
    #[serde(default)]
    pub key_number: Option<String>,
    #[serde(default)]
    pub signed_out_to: Option<String>,
    #[serde(default)]
    pub signed_out_at: Option<DateTime<Utc>>,
}

impl KeyConflict {
    /// Confirmation prompt shown before a forced sign-out.
    pub fn prompt(&self) -> String {
        let key = match &self.key_number {
            Some(number) => format!("Key {number}"),
            None => "This key".to_string(),
        };
        match (&self.signed_out_to, self.signed_out_at) {
            (Some(holder), Some(at)) => format!(
                "{key} is already signed out to {holder} since {}. Sign it out anyway?",
                format_timestamp(Some(at))
            ),
            (Some(holder), None) => {
                format!("{key} is already signed out to {holder}. Sign it out anyway?")
            }
            _ => format!("{key} is already signed out. Sign it out anyway?"),
        }
    }
}
