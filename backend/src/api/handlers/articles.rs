//! Reader-facing article endpoints. Only published articles are visible.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::api::response::ApiResponse;
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::article::{ArticleDetail, ArticleSummary};
use crate::validation::{parse_id, parse_year, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/articles", get(list_by_category))
        .route("/articles/top", get(top_content))
        .route("/articles/:year/:edition_id/:slug", get(get_article))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Category id
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct TopContentQuery {
    /// Edition id; defaults to the active edition
    pub edition_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/articles",
    context_path = "/api",
    tag = "articles",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Published articles in the category", body = [ArticleSummary]),
        (status = 400, description = "Missing or non-integer category")
    )
)]
pub async fn list_by_category(
    State(state): State<SharedState>,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Vec<ArticleSummary>>> {
    let raw = query
        .category
        .ok_or_else(|| AppError::invalid("invalid category id", "category query parameter is required"))?;
    let category_id = parse_id(&raw, IdKind::Category)?;

    let articles = state
        .bounded(state.article_service().published_in_category(category_id))
        .await?;
    Ok(ApiResponse::ok(articles))
}

#[utoipa::path(
    get,
    path = "/articles/top",
    context_path = "/api",
    tag = "articles",
    params(TopContentQuery),
    responses(
        (status = 200, description = "Published top-content articles", body = [ArticleSummary]),
        (status = 400, description = "Non-integer edition id")
    )
)]
pub async fn top_content(
    State(state): State<SharedState>,
    Query(query): Query<TopContentQuery>,
) -> Result<ApiResponse<Vec<ArticleSummary>>> {
    let edition_id = query
        .edition_id
        .as_deref()
        .map(|raw| parse_id(raw, IdKind::Edition))
        .transpose()?;

    let articles = state
        .bounded(state.article_service().top_content(edition_id))
        .await?;
    Ok(ApiResponse::ok(articles))
}

#[utoipa::path(
    get,
    path = "/articles/{year}/{edition_id}/{slug}",
    context_path = "/api",
    tag = "articles",
    params(
        ("year" = i32, Path, description = "Edition year"),
        ("edition_id" = i64, Path, description = "Edition ID"),
        ("slug" = String, Path, description = "Article slug")
    ),
    responses(
        (status = 200, description = "Published article", body = ArticleDetail),
        (status = 400, description = "Malformed year or edition id"),
        (status = 404, description = "No published article at this address")
    )
)]
pub async fn get_article(
    State(state): State<SharedState>,
    Path((year, edition_id, slug)): Path<(String, String, String)>,
) -> Result<ApiResponse<ArticleDetail>> {
    let year = parse_year(&year)?;
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;

    let article = state
        .bounded(state.article_service().published_detail(year, edition_id, &slug))
        .await?;
    Ok(ApiResponse::ok(article))
}

#[derive(OpenApi)]
#[openapi(
    paths(list_by_category, top_content, get_article),
    components(schemas(ArticleSummary, ArticleDetail))
)]
pub struct ArticlesApiDoc;
