//! Remote call failure taxonomy.
//!
//! Transport failures and non-2xx responses are both terminal for the
//! initiating action: the caller shows [`ApiError::user_message`] inline and
//! keeps the form state for correction.

use serde_json::Value;
use thiserror::Error;

use fleetdesk_fleet::KeyConflict;

pub type ApiResult<T> = Result<T, ApiError>;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` is the server's own text when it sent one.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A key sign-out collided with an existing holder (HTTP 409 on the
    /// sign-out endpoint). `message` is the server's text, or the
    /// confirmation prompt when the body had none.
    #[error("conflict: {message}")]
    Conflict { message: String, conflict: KeyConflict },

    /// 2xx response whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the inline error area.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Conflict { message, .. } => message.clone(),
            ApiError::Decode(_) => "Unexpected response from server.".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Conflict { .. } => Some(409),
            _ => None,
        }
    }

    /// Build an HTTP error from a status and raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Http {
            status,
            message: message_from_body(body).unwrap_or_else(|| generic_message(status)),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

pub fn generic_message(status: u16) -> String {
    format!("Request failed (HTTP {status}).")
}

/// Best-effort: `message`, then `error`, from a JSON object body.
pub fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    ["message", "error"].iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
