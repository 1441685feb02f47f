//! Liveness and health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::response::{ApiResponse, MessageBody};
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::services::bounded;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub storage: CheckStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy".to_string(),
                message: None,
            },
            Err(e) => Self {
                status: "unhealthy".to_string(),
                message: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Database ping under the health deadline.
#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = MessageBody),
        (status = 408, description = "Ping exceeded its deadline"),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn ping(State(state): State<SharedState>) -> Result<ApiResponse<MessageBody>> {
    bounded(state.config.health_timeout, async {
        sqlx::query("SELECT 1").execute(&state.db).await?;
        Ok(())
    })
    .await?;
    Ok(ApiResponse::ok(MessageBody::new("pong")))
}

/// Database and object store checks.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies healthy", body = HealthResponse),
        (status = 503, description = "A dependency is unhealthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let deadline = state.config.health_timeout;

    let database = CheckStatus::from_result(
        bounded(deadline, async {
            sqlx::query("SELECT 1")
                .execute(&state.db)
                .await
                .map(|_| ())
                .map_err(AppError::from)
        })
        .await,
    );
    let storage = CheckStatus::from_result(bounded(deadline, state.store.health()).await);

    let healthy = database.is_healthy() && storage.is_healthy();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, storage },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    ApiResponse::with_status(status, response)
}

#[derive(OpenApi)]
#[openapi(
    paths(ping, health_check),
    components(schemas(HealthResponse, HealthChecks, CheckStatus, MessageBody))
)]
pub struct HealthApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_from_result() {
        let ok = CheckStatus::from_result(Ok(()));
        assert!(ok.is_healthy());
        assert!(ok.message.is_none());

        let failed = CheckStatus::from_result(Err(AppError::Storage("bucket gone".into())));
        assert!(!failed.is_healthy());
        assert!(failed.message.unwrap().contains("bucket gone"));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            checks: HealthChecks {
                database: CheckStatus::from_result(Ok(())),
                storage: CheckStatus::from_result(Ok(())),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["checks"]["database"]["status"], "healthy");
        assert!(json["checks"]["storage"].get("message").is_none());
    }
}
