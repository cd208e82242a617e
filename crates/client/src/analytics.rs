//! Aggregate analytics endpoints.
//!
//! Payloads are passed through as opaque JSON; shaping them for charts is the
//! caller's concern.

use fleetdesk_core::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    /// `/data-analytics/metric{n}` for n in 1..=3.
    DataAnalytics(u8),
    /// `/api/performance/{name}`.
    Performance(String),
}

impl Metric {
    pub fn data_analytics(n: u8) -> DomainResult<Self> {
        if (1..=3).contains(&n) {
            Ok(Self::DataAnalytics(n))
        } else {
            Err(DomainError::validation(format!("unknown analytics metric {n}")))
        }
    }

    /// Names are restricted to `[a-z0-9_-]` so they are safe as a path segment.
    pub fn performance(name: &str) -> DomainResult<Self> {
        let name = name.trim();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if valid {
            Ok(Self::Performance(name.to_string()))
        } else {
            Err(DomainError::validation(format!("invalid performance metric name {name:?}")))
        }
    }

    pub fn path(&self) -> String {
        match self {
            Metric::DataAnalytics(n) => format!("/data-analytics/metric{n}"),
            Metric::Performance(name) => format!("/api/performance/{name}"),
        }
    }
}
