//! Deficiency records on a vehicle and the create/edit form.
//!
//! Unknown status values from the backend are kept as-is so an edit does
//! not silently rewrite them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fleetdesk_core::{DeficiencyId, DomainError, DomainResult};

use crate::fields::Fields;

/// Workflow status of a deficiency.
///
/// Unknown statuses are preserved verbatim so a newer backend does not lose
/// information when a record is edited and sent back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeficiencyStatus {
    Open,
    Booked,
    Resolved,
    Other(String),
}

impl DeficiencyStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "OPEN" => Self::Open,
            "BOOKED" => Self::Booked,
            "RESOLVED" | "CLOSED" => Self::Resolved,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "OPEN",
            Self::Booked => "BOOKED",
            Self::Resolved => "RESOLVED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for DeficiencyStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DeficiencyStatus> for String {
    fn from(value: DeficiencyStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A deficiency as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deficiency {
    /// `None` only for a client-side placeholder that was never persisted.
    pub id: Option<DeficiencyId>,
    pub description: String,
    pub severity: String,
    pub status: DeficiencyStatus,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deficiency {
    /// Normalize one backend row. Key fallbacks: `id` then `deficiency_id`;
    /// `updated_at` then `created_at`.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| DomainError::validation("deficiency row is not an object"))?;
        let f = Fields::new(map);
        Ok(Self {
            id: f.integer(&["id", "deficiency_id"]).map(DeficiencyId::new),
            description: f.string(&["description"]).unwrap_or_default(),
            severity: f.string(&["severity"]).unwrap_or_default(),
            status: f
                .string(&["status"])
                .map(|s| DeficiencyStatus::parse(&s))
                .unwrap_or(DeficiencyStatus::Open),
            updated_by: f.string(&["updated_by", "created_by"]),
            updated_at: f.timestamp(&["updated_at", "created_at"]),
        })
    }

    pub fn is_open(&self) -> bool {
        self.status != DeficiencyStatus::Resolved
    }
}

/// Write body for creating or editing a deficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeficiencyDraft {
    pub description: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeficiencyStatus>,
    pub updated_by: String,
}

/// Raw operator input from the create/edit deficiency modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeficiencyForm {
    pub description: String,
    pub severity: String,
    pub status: Option<DeficiencyStatus>,
    /// Dedicated "updated by" field of the modal.
    pub updated_by: String,
    /// Inspector name typed elsewhere on the page; used when `updated_by` is blank.
    pub inspector_name: String,
}

impl DeficiencyForm {
    /// Pre-fill the edit modal from a stored deficiency.
    pub fn editing(deficiency: &Deficiency, inspector_name: impl Into<String>) -> Self {
        Self {
            description: deficiency.description.clone(),
            severity: deficiency.severity.clone(),
            status: Some(deficiency.status.clone()),
            updated_by: String::new(),
            inspector_name: inspector_name.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<DeficiencyDraft> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation("Description is required."));
        }
        let severity = self.severity.trim();
        if severity.is_empty() {
            return Err(DomainError::validation("Severity is required."));
        }
        let updated_by = match self.updated_by.trim() {
            "" => self.inspector_name.trim(),
            name => name,
        };
        if updated_by.is_empty() {
            return Err(DomainError::validation("Updated by is required."));
        }
        Ok(DeficiencyDraft {
            description: description.to_string(),
            severity: severity.to_string(),
            status: self.status.clone(),
            updated_by: updated_by.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_row_with_fallback_keys() {
        let def = Deficiency::from_json(&json!({
            "deficiency_id": "12",
            "description": "Cracked mirror",
            "severity": "minor",
            "status": "booked",
            "created_by": "Dana",
            "created_at": "2024-03-01 08:00:00"
        }))
        .unwrap();
        assert_eq!(def.id, Some(DeficiencyId::new(12)));
        assert_eq!(def.status, DeficiencyStatus::Booked);
        assert_eq!(def.updated_by.as_deref(), Some("Dana"));
        assert!(def.updated_at.is_some());
        assert!(def.is_open());
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = DeficiencyStatus::parse("Awaiting Parts");
        assert_eq!(status.as_str(), "Awaiting Parts");
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Awaiting Parts"));
        assert!(!Deficiency {
            id: None,
            description: String::new(),
            severity: String::new(),
            status: DeficiencyStatus::parse("closed"),
            updated_by: None,
            updated_at: None,
        }
        .is_open());
    }

    #[test]
    fn form_requires_description_and_severity() {
        let mut form = DeficiencyForm {
            updated_by: "Lee".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            DomainError::validation("Description is required.")
        );
        form.description = "Brake light out".into();
        assert_eq!(
            form.validate().unwrap_err(),
            DomainError::validation("Severity is required.")
        );
    }

    #[test]
    fn attributed_user_falls_back_to_inspector_name() {
        let form = DeficiencyForm {
            description: " Brake light out ".into(),
            severity: "major".into(),
            status: None,
            updated_by: "   ".into(),
            inspector_name: "Priya".into(),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.updated_by, "Priya");
        assert_eq!(draft.description, "Brake light out");

        let anonymous = DeficiencyForm {
            inspector_name: String::new(),
            ..form
        };
        assert_eq!(
            anonymous.validate().unwrap_err(),
            DomainError::validation("Updated by is required.")
        );
    }
}
