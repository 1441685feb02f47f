//! Admin writer endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::extract::JsonBody;
use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::category::Writer;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/writers", get(list_writers))
        .route("/writer", post(create_writer))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWriterRequest {
    pub writer_name: String,
}

#[utoipa::path(
    get,
    path = "/writers",
    context_path = "/api/core",
    tag = "admin",
    responses((status = 200, description = "Writers by name", body = [Writer]))
)]
pub async fn list_writers(State(state): State<SharedState>) -> Result<ApiResponse<Vec<Writer>>> {
    let writers = state
        .bounded(state.category_service().list_writers())
        .await?;
    Ok(ApiResponse::ok(writers))
}

#[utoipa::path(
    post,
    path = "/writer",
    context_path = "/api/core",
    tag = "admin",
    request_body = CreateWriterRequest,
    responses(
        (status = 201, description = "Writer created", body = Writer),
        (status = 400, description = "Empty name")
    )
)]
pub async fn create_writer(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreateWriterRequest>,
) -> Result<ApiResponse<Writer>> {
    let writer = state
        .bounded(state.category_service().create_writer(&payload.writer_name))
        .await?;
    Ok(ApiResponse::created(writer))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_writers, create_writer),
    components(schemas(Writer, CreateWriterRequest))
)]
pub struct WritersApiDoc;
