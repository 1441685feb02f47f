//! Admin edition endpoints: create, edit, publish.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::extract::JsonBody;
use crate::api::response::{ApiResponse, MessageBody};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::edition::{Edition, EditionInfo, EditionList};
use crate::services::edition_service::EditionPublished;
use crate::validation::{parse_id, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/editions", get(list_editions))
        .route("/edition", post(create_edition))
        .route("/editions/:edition_id", get(get_edition_info))
        .route("/editions/:edition_id/save-info", put(save_edition_info))
        .route("/editions/:edition_id/publish", put(publish_edition))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditionInfoRequest {
    pub title: String,
    pub year: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedId {
    pub id: i64,
}

#[utoipa::path(
    get,
    path = "/editions",
    context_path = "/api/core",
    tag = "admin",
    responses(
        (status = 200, description = "All editions and the active edition id", body = EditionList)
    )
)]
pub async fn list_editions(State(state): State<SharedState>) -> Result<ApiResponse<EditionList>> {
    let list = state.bounded(state.edition_service().list_all()).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    post,
    path = "/edition",
    context_path = "/api/core",
    tag = "admin",
    request_body = EditionInfoRequest,
    responses(
        (status = 201, description = "Edition created with placeholder images", body = CreatedId),
        (status = 400, description = "Empty title or year before 1970")
    )
)]
pub async fn create_edition(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<EditionInfoRequest>,
) -> Result<ApiResponse<CreatedId>> {
    tracing::debug!(title = %payload.title, year = payload.year, "Create edition request");
    let id = state
        .bounded(state.edition_service().create(&payload.title, payload.year))
        .await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

#[utoipa::path(
    get,
    path = "/editions/{edition_id}",
    context_path = "/api/core",
    tag = "admin",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Edition info with active flag", body = EditionInfo),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn get_edition_info(
    State(state): State<SharedState>,
    Path(edition_id): Path<String>,
) -> Result<ApiResponse<EditionInfo>> {
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    let info = state
        .bounded(state.edition_service().info(edition_id))
        .await?;
    Ok(ApiResponse::ok(info))
}

#[utoipa::path(
    put,
    path = "/editions/{edition_id}/save-info",
    context_path = "/api/core",
    tag = "admin",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    request_body = EditionInfoRequest,
    responses(
        (status = 200, description = "Edition updated", body = MessageBody),
        (status = 400, description = "Invalid id, title or year"),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn save_edition_info(
    State(state): State<SharedState>,
    Path(edition_id): Path<String>,
    JsonBody(payload): JsonBody<EditionInfoRequest>,
) -> Result<ApiResponse<MessageBody>> {
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    tracing::debug!(edition_id, title = %payload.title, year = payload.year, "Save edition info request");
    state
        .bounded(
            state
                .edition_service()
                .save_info(edition_id, &payload.title, payload.year),
        )
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Edition updated successfully")))
}

#[utoipa::path(
    put,
    path = "/editions/{edition_id}/publish",
    context_path = "/api/core",
    tag = "admin",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Edition published and made active", body = EditionPublished),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn publish_edition(
    State(state): State<SharedState>,
    Path(edition_id): Path<String>,
) -> Result<ApiResponse<EditionPublished>> {
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    let published = state
        .bounded(state.edition_service().publish(edition_id))
        .await?;
    Ok(ApiResponse::ok(published))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_editions,
        create_edition,
        get_edition_info,
        save_edition_info,
        publish_edition,
    ),
    components(schemas(
        EditionInfoRequest,
        CreatedId,
        Edition,
        EditionList,
        EditionInfo,
        EditionPublished,
        MessageBody,
    ))
)]
pub struct AdminEditionsApiDoc;
