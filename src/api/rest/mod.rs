//! REST API module for HTTP endpoints
//!
//! Mutations and point reads; clients call the point reads when they
//! (re)subscribe, since the bus does not replay:
//! - `POST /api/tables/switch` - Join, switch or leave a table
//! - `GET /api/tables/:id/members` - Current occupants of a table
//! - `POST /api/chat` / `GET /api/chat` - Send and page chat messages
//! - `POST /api/surveys/:id/next` / `POST /api/surveys/answer` - Drive a live survey
//! - `POST /api/events` / `POST /api/events/:id/tables` - Host event management

pub mod chat;
pub mod events;
pub mod surveys;
pub mod tables;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::error::{PresenceError, PresenceResult};

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, "NOT_FOUND")
    }
}

impl From<&PresenceError> for ApiError {
    fn from(e: &PresenceError) -> Self {
        Self::new(e.to_string(), e.code())
    }
}

/// HTTP status for each error kind
pub fn status_for(e: &PresenceError) -> StatusCode {
    match e {
        PresenceError::NotFound { .. } => StatusCode::NOT_FOUND,
        PresenceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        PresenceError::CapacityExceeded { .. } => StatusCode::CONFLICT,
        PresenceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PresenceError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn an operation result into a JSON response
pub fn respond<T: Serialize>(result: PresenceResult<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                warn!(error = %e, "Request failed");
            }
            (status, Json(ApiError::from(&e))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&PresenceError::not_found("event", 1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&PresenceError::PermissionDenied("no".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&PresenceError::CapacityExceeded { limit: 16 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&PresenceError::StoreUnavailable("down".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_api_error_carries_code() {
        let err = ApiError::from(&PresenceError::CapacityExceeded { limit: 16 });
        assert_eq!(err.code, "CAPACITY_EXCEEDED");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error\""));
    }
}
