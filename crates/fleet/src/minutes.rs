//! Operations meeting minutes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fleetdesk_core::{DomainError, DomainResult, MinutesId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingMinutes {
    pub id: MinutesId,
    pub title: String,
    pub held_on: NaiveDate,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub body: String,
}

/// Body for creating or updating minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinutesDraft {
    pub title: String,
    pub held_on: NaiveDate,
    pub attendees: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinutesForm {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub held_on: String,
    /// Comma-separated names.
    pub attendees: String,
    pub body: String,
}

impl MinutesForm {
    pub fn editing(minutes: &MeetingMinutes) -> Self {
        Self {
            title: minutes.title.clone(),
            held_on: minutes.held_on.format("%Y-%m-%d").to_string(),
            attendees: minutes.attendees.join(", "),
            body: minutes.body.clone(),
        }
    }

    pub fn validate(&self) -> DomainResult<MinutesDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Title is required."));
        }
        let held_on = NaiveDate::parse_from_str(self.held_on.trim(), "%Y-%m-%d")
            .map_err(|_| DomainError::validation("Meeting date must be YYYY-MM-DD."))?;
        let attendees = self
            .attendees
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Ok(MinutesDraft {
            title: title.to_string(),
            held_on,
            attendees,
            body: self.body.trim().to_string(),
        })
    }
}
