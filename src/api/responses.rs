//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::TimerError, presenter::SoundSelection, timer::TimerSnapshot};

/// API response structure for timer operations
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response for a command that went through
    pub fn ok(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        Self::new("ok".to_string(), message.into(), timer)
    }
}

/// Status response with the rendered countdown
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    /// Countdown as `MM:SS`
    pub display: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Maps timer errors onto HTTP responses.
///
/// The driver applies a change in memory even when the store write fails and
/// replies with the new snapshot, so handlers answer 200 for persistence
/// failures and never build an `ApiError` from one.
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match self.0 {
            TimerError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
            // Not produced by the driver; kept so the mapping stays total
            TimerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimerError::DriverUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}

/// Body of `PUT /config`; missing fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigRequest {
    pub work_minutes: Option<i64>,
    pub break_minutes: Option<i64>,
}

/// Body of `PUT /sound`
#[derive(Debug, Clone, Deserialize)]
pub struct SoundRequest {
    pub sound: SoundSelection,
}

/// Body of `PUT /theme`
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRequest {
    pub dark_mode: bool,
}
