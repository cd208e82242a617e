//! `fleetdesk-client`
//!
//! **Responsibility:** remote sync with the fleet backend.
//!
//! The backend is the authority for every record. This crate only reads
//! snapshots and forwards writes; it keeps no cache and never retries.
//! Callers reload after each successful write.

pub mod analytics;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;

pub use analytics::Metric;
pub use backend::FleetBackend;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use http::FleetClient;
