//! Admin article endpoints: drafting, editing and lifecycle transitions.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::extract::JsonBody;
use crate::api::handlers::admin_editions::CreatedId;
use crate::api::response::{ApiResponse, MessageBody};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::article::{Article, ArticleContent, ArticleInfo, ArticleListItem, ArticleStatus};
use crate::models::category::CategoryOption;
use crate::services::lifecycle::LifecycleChange;
use crate::validation::{parse_id, require_non_empty, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/article", post(create_article))
        .route("/articles/drafts", get(list_drafts))
        .route("/editions/:edition_id/articles", get(list_edition_articles))
        .route(
            "/articles/:article_id",
            get(get_article).delete(delete_article),
        )
        .route("/articles/:article_id/info", get(get_article_info))
        .route("/articles/:article_id/content", get(get_article_content))
        .route("/articles/:article_id/categories", get(get_category_options))
        .route("/articles/:article_id/save-info", put(save_article_info))
        .route("/articles/:article_id/save-draft", put(save_draft))
        .route("/articles/:article_id/publish", put(publish_article))
        .route("/articles/:article_id/archive", put(archive_article))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub edition_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveInfoRequest {
    pub title: String,
    pub category_id: i64,
    pub writer_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveInfoResponse {
    pub id: i64,
    pub slug: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    /// Editor document, stored as-is
    #[schema(value_type = Object)]
    pub contents: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftResponse {
    pub id: i64,
    pub updated_at: DateTime<Utc>,
}

fn article_id(raw: &str) -> Result<i64> {
    parse_id(raw, IdKind::Article)
}

#[utoipa::path(
    post,
    path = "/article",
    context_path = "/api/core",
    tag = "admin",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Draft article created", body = CreatedId),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn create_article(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreateArticleRequest>,
) -> Result<ApiResponse<CreatedId>> {
    tracing::debug!(edition_id = payload.edition_id, "Create article request");
    let id = state
        .bounded(state.article_service().create(payload.edition_id))
        .await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

#[utoipa::path(
    get,
    path = "/articles/drafts",
    context_path = "/api/core",
    tag = "admin",
    responses((status = 200, description = "Draft articles, recently edited first", body = [ArticleListItem]))
)]
pub async fn list_drafts(
    State(state): State<SharedState>,
) -> Result<ApiResponse<Vec<ArticleListItem>>> {
    let drafts = state.bounded(state.article_service().list_drafts()).await?;
    Ok(ApiResponse::ok(drafts))
}

#[utoipa::path(
    get,
    path = "/editions/{edition_id}/articles",
    context_path = "/api/core",
    tag = "admin",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    responses((status = 200, description = "All articles of the edition", body = [ArticleListItem]))
)]
pub async fn list_edition_articles(
    State(state): State<SharedState>,
    Path(edition_id): Path<String>,
) -> Result<ApiResponse<Vec<ArticleListItem>>> {
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    let articles = state
        .bounded(state.article_service().list_by_edition(edition_id))
        .await?;
    Ok(ApiResponse::ok(articles))
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Full article row", body = Article),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Article>> {
    let id = article_id(&id)?;
    let article = state.bounded(state.article_service().get(id)).await?;
    Ok(ApiResponse::ok(article))
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}/info",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Editable attributes", body = ArticleInfo),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article_info(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ArticleInfo>> {
    let id = article_id(&id)?;
    let info = state.bounded(state.article_service().info(id)).await?;
    Ok(ApiResponse::ok(info))
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}/content",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Editor document", body = ArticleContent),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article_content(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ArticleContent>> {
    let id = article_id(&id)?;
    let content = state.bounded(state.article_service().content(id)).await?;
    Ok(ApiResponse::ok(content))
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}/categories",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Categories the article may be filed under", body = [CategoryOption]),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_category_options(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<CategoryOption>>> {
    let id = article_id(&id)?;
    let options = state
        .bounded(state.article_service().category_options(id))
        .await?;
    Ok(ApiResponse::ok(options))
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/save-info",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = SaveInfoRequest,
    responses(
        (status = 200, description = "Attributes saved, slug recomputed", body = SaveInfoResponse),
        (status = 400, description = "Empty title or unknown category/writer"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn save_article_info(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<SaveInfoRequest>,
) -> Result<ApiResponse<SaveInfoResponse>> {
    let id = article_id(&id)?;
    require_non_empty("title", &payload.title)?;
    tracing::debug!(
        article_id = id,
        title = %payload.title,
        category_id = payload.category_id,
        writer_id = payload.writer_id,
        "Save article info request"
    );

    let slug = state
        .bounded(state.article_service().save_attributes(
            id,
            &payload.title,
            payload.category_id,
            payload.writer_id,
        ))
        .await?;
    Ok(ApiResponse::ok(SaveInfoResponse { id, slug }))
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/save-draft",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = SaveDraftResponse),
        (status = 404, description = "Article not found")
    )
)]
pub async fn save_draft(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<SaveDraftRequest>,
) -> Result<ApiResponse<SaveDraftResponse>> {
    let id = article_id(&id)?;
    // Contents are logged by size only.
    tracing::debug!(
        article_id = id,
        bytes = payload.contents.to_string().len(),
        "Save draft request"
    );

    let updated_at = state
        .bounded(state.article_service().save_draft(id, &payload.contents))
        .await?;
    Ok(ApiResponse::ok(SaveDraftResponse { id, updated_at }))
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/publish",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article published", body = LifecycleChange),
        (status = 404, description = "Article not found")
    )
)]
pub async fn publish_article(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<LifecycleChange>> {
    let id = article_id(&id)?;
    let change = state.bounded(state.article_service().publish(id)).await?;
    Ok(ApiResponse::ok(change))
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/archive",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article archived", body = LifecycleChange),
        (status = 404, description = "Article not found")
    )
)]
pub async fn archive_article(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<LifecycleChange>> {
    let id = article_id(&id)?;
    let change = state.bounded(state.article_service().archive(id)).await?;
    Ok(ApiResponse::ok(change))
}

#[utoipa::path(
    delete,
    path = "/articles/{article_id}",
    context_path = "/api/core",
    tag = "admin",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article permanently deleted", body = MessageBody),
        (status = 404, description = "Article not found")
    )
)]
pub async fn delete_article(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<MessageBody>> {
    let id = article_id(&id)?;
    state
        .bounded(state.article_service().delete_permanent(id))
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Article deleted successfully")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_article,
        list_drafts,
        list_edition_articles,
        get_article,
        get_article_info,
        get_article_content,
        get_category_options,
        save_article_info,
        save_draft,
        publish_article,
        archive_article,
        delete_article,
    ),
    components(schemas(
        CreateArticleRequest,
        SaveInfoRequest,
        SaveInfoResponse,
        SaveDraftRequest,
        SaveDraftResponse,
        Article,
        ArticleInfo,
        ArticleContent,
        ArticleListItem,
        ArticleStatus,
        CategoryOption,
        LifecycleChange,
    ))
)]
pub struct AdminArticlesApiDoc;
