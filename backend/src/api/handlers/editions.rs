//! Reader-facing edition endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use utoipa::OpenApi;

use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::category::CategoryItem;
use crate::models::edition::{Edition, EditionDetail};
use crate::validation::{parse_id, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/editions", get(list_editions))
        .route("/editions/active", get(active_edition))
        .route("/editions/:edition_id", get(get_edition))
}

#[utoipa::path(
    get,
    path = "/editions",
    context_path = "/api",
    tag = "editions",
    responses(
        (status = 200, description = "Published editions, newest first", body = [Edition]),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_editions(State(state): State<SharedState>) -> Result<ApiResponse<Vec<Edition>>> {
    let editions = state
        .bounded(state.edition_service().list_published())
        .await?;
    Ok(ApiResponse::ok(editions))
}

#[utoipa::path(
    get,
    path = "/editions/active",
    context_path = "/api",
    tag = "editions",
    responses(
        (status = 200, description = "The active edition", body = Edition),
        (status = 404, description = "No edition has been published yet")
    )
)]
pub async fn active_edition(State(state): State<SharedState>) -> Result<ApiResponse<Edition>> {
    let edition = state.bounded(state.edition_service().active()).await?;
    Ok(ApiResponse::ok(edition))
}

#[utoipa::path(
    get,
    path = "/editions/{edition_id}",
    context_path = "/api",
    tag = "editions",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Edition with its categories", body = EditionDetail),
        (status = 400, description = "Edition id is not an integer"),
        (status = 404, description = "Edition missing or unpublished")
    )
)]
pub async fn get_edition(
    State(state): State<SharedState>,
    Path(edition_id): Path<String>,
) -> Result<ApiResponse<EditionDetail>> {
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    let detail = state
        .bounded(state.edition_service().published_detail(edition_id))
        .await?;
    Ok(ApiResponse::ok(detail))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_editions, active_edition, get_edition),
    components(schemas(Edition, EditionDetail, CategoryItem))
)]
pub struct EditionsApiDoc;
