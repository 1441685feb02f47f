//! Response envelope shared by every JSON endpoint.
//!
//! Success and failure bodies have the same outer shape:
//! `{"_id": <uuid>, "timestamp": <unix ms>, "data": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Unix time in milliseconds.
    pub timestamp: i64,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().timestamp_millis(),
            data,
        }
    }
}

/// Failure payload carried in `data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

/// Plain confirmation payload for mutations without a richer result.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful JSON response wrapped in an [`Envelope`].
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status,
            envelope: Envelope::new(data),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    pub fn accepted(data: T) -> Self {
        Self::with_status(StatusCode::ACCEPTED, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        tracing::debug!(
            response_id = %self.envelope.id,
            status = self.status.as_u16(),
            "Sending response"
        );
        (self.status, Json(self.envelope)).into_response()
    }
}
