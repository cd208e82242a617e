//! Dashboard settings, read once at startup.

use std::time::Duration;

use fleetdesk_client::config::parse_var;
use fleetdesk_client::{ClientConfig, ConfigError};
use fleetdesk_fleet::OverduePolicy;
use fleetdesk_fleet::issues::DEFAULT_INSPECTION_OVERDUE_DAYS;

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub client: ClientConfig,
    pub inspection_overdue_days: u32,
    pub refresh_interval: Duration,
    pub search_debounce: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            inspection_overdue_days: DEFAULT_INSPECTION_OVERDUE_DAYS,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inspection_overdue_days = parse_var(
            &lookup,
            "FLEETDESK_INSPECTION_OVERDUE_DAYS",
            DEFAULT_INSPECTION_OVERDUE_DAYS,
        )?;
        let refresh_secs: u64 = parse_var(&lookup, "FLEETDESK_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "FLEETDESK_REFRESH_SECS".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let debounce_ms: u64 = parse_var(
            &lookup,
            "FLEETDESK_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?;

        Ok(Self {
            client: ClientConfig::from_lookup(&lookup)?,
            inspection_overdue_days,
            refresh_interval: Duration::from_secs(refresh_secs),
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }

    pub fn overdue_policy(&self) -> OverduePolicy {
        OverduePolicy::new(self.inspection_overdue_days)
    }
}
