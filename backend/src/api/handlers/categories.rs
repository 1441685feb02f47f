//! Reader-facing category listing.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::category::CategoryOption;
use crate::validation::{parse_id, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new().route("/categories", get(list_categories))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EditionQuery {
    /// Edition id
    pub edition: Option<String>,
}

#[utoipa::path(
    get,
    path = "/categories",
    context_path = "/api",
    tag = "categories",
    params(EditionQuery),
    responses(
        (status = 200, description = "Categories with published articles in the edition", body = [CategoryOption]),
        (status = 400, description = "Missing or non-integer edition")
    )
)]
pub async fn list_categories(
    State(state): State<SharedState>,
    Query(query): Query<EditionQuery>,
) -> Result<ApiResponse<Vec<CategoryOption>>> {
    let raw = query
        .edition
        .ok_or_else(|| AppError::invalid("invalid edition id", "edition query parameter is required"))?;
    let edition_id = parse_id(&raw, IdKind::Edition)?;

    let categories = state
        .bounded(state.category_service().used_in_edition(edition_id))
        .await?;
    Ok(ApiResponse::ok(categories))
}

#[derive(OpenApi)]
#[openapi(paths(list_categories), components(schemas(CategoryOption)))]
pub struct CategoriesApiDoc;
