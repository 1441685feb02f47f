//! Cover image endpoints for articles and editions.
//!
//! Both owners share the same four operations; the article side also issues
//! upload URLs for images embedded in the body.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::extract::JsonBody;
use crate::api::response::{ApiResponse, MessageBody};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::edition::CoverPaths;
use crate::services::asset_service::UploadTicket;
use crate::storage::asset_path::AssetOwner;
use crate::validation::{parse_id, IdKind, RenameSource};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/articles/:article_id/cover",
            post(article_cover_upload).get(article_cover_paths),
        )
        .route(
            "/articles/:article_id/cover/thumbnail",
            put(article_thumbnail),
        )
        .route("/articles/:article_id/cover/rename", put(article_rename))
        .route("/articles/:article_id/images", post(article_image_upload))
        .route(
            "/editions/:edition_id/cover",
            post(edition_cover_upload).get(edition_cover_paths),
        )
        .route(
            "/editions/:edition_id/cover/thumbnail",
            put(edition_thumbnail),
        )
        .route("/editions/:edition_id/cover/rename", put(edition_rename))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    pub file_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameArticleCoverRequest {
    pub new_headline: String,
    /// `google-cloud` or `user-input`
    pub source: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameEditionCoverRequest {
    pub new_cover: String,
    /// `google-cloud` or `user-input`
    pub source: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameResponse {
    pub message: String,
    pub id: i64,
    pub cover_img: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_img: Option<String>,
    pub updated_at: DateTime<Utc>,
}

fn owner_id(owner: AssetOwner, raw: &str) -> Result<i64> {
    match owner {
        AssetOwner::Article => parse_id(raw, IdKind::Article),
        AssetOwner::Edition => parse_id(raw, IdKind::Edition),
    }
}

async fn issue_upload(
    state: &SharedState,
    owner: AssetOwner,
    raw_id: &str,
    payload: UploadRequest,
) -> Result<ApiResponse<UploadTicket>> {
    let id = owner_id(owner, raw_id)?;
    tracing::debug!(
        owner = owner.label(),
        id,
        file_name = %payload.file_name,
        content_type = %payload.content_type,
        "Upload URL request"
    );
    let ticket = state
        .bounded(state.asset_service().issue_upload_url(
            owner,
            id,
            &payload.file_name,
            &payload.content_type,
        ))
        .await?;
    Ok(ApiResponse::ok(ticket))
}

async fn cover_paths(
    state: &SharedState,
    owner: AssetOwner,
    raw_id: &str,
) -> Result<ApiResponse<CoverPaths>> {
    let id = owner_id(owner, raw_id)?;
    let paths = state
        .bounded(state.asset_service().cover_paths(owner, id))
        .await?;
    Ok(ApiResponse::ok(paths))
}

async fn set_thumbnail(
    state: &SharedState,
    owner: AssetOwner,
    raw_id: &str,
    payload: ThumbnailRequest,
) -> Result<ApiResponse<MessageBody>> {
    let id = owner_id(owner, raw_id)?;
    tracing::debug!(owner = owner.label(), id, file_name = %payload.file_name, "Thumbnail update request");
    state
        .bounded(
            state
                .asset_service()
                .update_thumbnail(owner, id, &payload.file_name),
        )
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Thumbnail updated successfully")))
}

async fn rename(
    state: &SharedState,
    owner: AssetOwner,
    raw_id: &str,
    field: &str,
    new_file_name: &str,
    source: &str,
) -> Result<ApiResponse<RenameResponse>> {
    let id = owner_id(owner, raw_id)?;
    let source = RenameSource::parse(source)?;
    tracing::debug!(owner = owner.label(), id, new_file_name, ?source, "Cover rename request");

    let outcome = state
        .bounded(
            state
                .asset_service()
                .rename_cover(owner, id, field, new_file_name, source),
        )
        .await?;
    Ok(ApiResponse::ok(RenameResponse {
        message: "Filename updated successfully".to_string(),
        id: outcome.id,
        cover_img: outcome.cover_img,
        thumbnail_img: outcome.thumbnail_img,
        updated_at: outcome.updated_at,
    }))
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/articles/{article_id}/cover",
    context_path = "/api/core",
    tag = "covers",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Signed upload URL and object key", body = UploadTicket),
        (status = 400, description = "Invalid filename or content type"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn article_cover_upload(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UploadRequest>,
) -> Result<ApiResponse<UploadTicket>> {
    issue_upload(&state, AssetOwner::Article, &id, payload).await
}

#[utoipa::path(
    post,
    path = "/articles/{article_id}/images",
    context_path = "/api/core",
    tag = "covers",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Signed upload URL for an in-body image", body = UploadTicket),
        (status = 400, description = "Invalid filename or content type"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn article_image_upload(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UploadRequest>,
) -> Result<ApiResponse<UploadTicket>> {
    issue_upload(&state, AssetOwner::Article, &id, payload).await
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}/cover",
    context_path = "/api/core",
    tag = "covers",
    params(("article_id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Current cover and thumbnail paths", body = CoverPaths),
        (status = 404, description = "Article not found")
    )
)]
pub async fn article_cover_paths(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<CoverPaths>> {
    cover_paths(&state, AssetOwner::Article, &id).await
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/cover/thumbnail",
    context_path = "/api/core",
    tag = "covers",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = ThumbnailRequest,
    responses(
        (status = 200, description = "Thumbnail pointer updated", body = MessageBody),
        (status = 400, description = "Empty filename"),
        (status = 404, description = "Article not found")
    )
)]
pub async fn article_thumbnail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ThumbnailRequest>,
) -> Result<ApiResponse<MessageBody>> {
    set_thumbnail(&state, AssetOwner::Article, &id, payload).await
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}/cover/rename",
    context_path = "/api/core",
    tag = "covers",
    params(("article_id" = i64, Path, description = "Article ID")),
    request_body = RenameArticleCoverRequest,
    responses(
        (status = 200, description = "Cover renamed", body = RenameResponse),
        (status = 400, description = "Invalid filename or source"),
        (status = 401, description = "Cover is still the placeholder"),
        (status = 404, description = "Article or object not found")
    )
)]
pub async fn article_rename(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<RenameArticleCoverRequest>,
) -> Result<ApiResponse<RenameResponse>> {
    rename(
        &state,
        AssetOwner::Article,
        &id,
        "newHeadline",
        &payload.new_headline,
        &payload.source,
    )
    .await
}

// ---------------------------------------------------------------------------
// Editions
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/editions/{edition_id}/cover",
    context_path = "/api/core",
    tag = "covers",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Signed upload URL and object key", body = UploadTicket),
        (status = 400, description = "Invalid filename or content type"),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn edition_cover_upload(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UploadRequest>,
) -> Result<ApiResponse<UploadTicket>> {
    issue_upload(&state, AssetOwner::Edition, &id, payload).await
}

#[utoipa::path(
    get,
    path = "/editions/{edition_id}/cover",
    context_path = "/api/core",
    tag = "covers",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    responses(
        (status = 200, description = "Current cover and thumbnail paths", body = CoverPaths),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn edition_cover_paths(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<CoverPaths>> {
    cover_paths(&state, AssetOwner::Edition, &id).await
}

#[utoipa::path(
    put,
    path = "/editions/{edition_id}/cover/thumbnail",
    context_path = "/api/core",
    tag = "covers",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    request_body = ThumbnailRequest,
    responses(
        (status = 200, description = "Thumbnail pointer updated", body = MessageBody),
        (status = 400, description = "Empty filename"),
        (status = 404, description = "Edition not found")
    )
)]
pub async fn edition_thumbnail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ThumbnailRequest>,
) -> Result<ApiResponse<MessageBody>> {
    set_thumbnail(&state, AssetOwner::Edition, &id, payload).await
}

#[utoipa::path(
    put,
    path = "/editions/{edition_id}/cover/rename",
    context_path = "/api/core",
    tag = "covers",
    params(("edition_id" = i64, Path, description = "Edition ID")),
    request_body = RenameEditionCoverRequest,
    responses(
        (status = 200, description = "Cover renamed", body = RenameResponse),
        (status = 400, description = "Invalid filename or source"),
        (status = 401, description = "Cover is still the placeholder"),
        (status = 404, description = "Edition or object not found")
    )
)]
pub async fn edition_rename(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<RenameEditionCoverRequest>,
) -> Result<ApiResponse<RenameResponse>> {
    rename(
        &state,
        AssetOwner::Edition,
        &id,
        "newCover",
        &payload.new_cover,
        &payload.source,
    )
    .await
}

#[derive(OpenApi)]
#[openapi(
    paths(
        article_cover_upload,
        article_image_upload,
        article_cover_paths,
        article_thumbnail,
        article_rename,
        edition_cover_upload,
        edition_cover_paths,
        edition_thumbnail,
        edition_rename,
    ),
    components(schemas(
        UploadRequest,
        UploadTicket,
        ThumbnailRequest,
        RenameArticleCoverRequest,
        RenameEditionCoverRequest,
        RenameResponse,
        CoverPaths,
        MessageBody,
    ))
)]
pub struct CoversApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{send, state_with_store};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());
        (router().with_state(state), dir)
    }

    #[tokio::test]
    async fn test_upload_rejects_forbidden_filename_chars() {
        for name in ["a/b.png", "a\\b.png", "what?.png", "100%.jpg", "x:y.webp", "a|b.jpg"] {
            let (app, _dir) = app();
            let (status, body) = send(
                app,
                Method::POST,
                "/articles/1/cover",
                Some(json!({ "fileName": name, "contentType": "image/png" })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
            assert_eq!(body["data"]["error"], "invalid filename", "{name}");
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image_content_type() {
        let (app, _dir) = app();
        let (status, body) = send(
            app,
            Method::POST,
            "/editions/2/cover",
            Some(json!({ "fileName": "cover.png", "contentType": "image/gif" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["error"], "invalid content type");
    }

    #[tokio::test]
    async fn test_rename_rejects_unknown_source() {
        let (app, _dir) = app();
        let (status, body) = send(
            app,
            Method::PUT,
            "/articles/1/cover/rename",
            Some(json!({ "newHeadline": "new.jpg", "source": "dropbox" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["error"], "invalid source field");
    }

    #[tokio::test]
    async fn test_edition_rename_uses_new_cover_field() {
        let (app, _dir) = app();
        let (status, body) = send(
            app,
            Method::PUT,
            "/editions/1/cover/rename",
            Some(json!({ "newHeadline": "new.jpg", "source": "user-input" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["data"]["details"].as_str().unwrap().contains("newCover"));
    }

    #[tokio::test]
    async fn test_thumbnail_rejects_bad_id() {
        let (app, _dir) = app();
        let (status, body) = send(
            app,
            Method::PUT,
            "/editions/two/cover/thumbnail",
            Some(json!({ "fileName": "thumb.jpg" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["error"], "invalid edition id");
    }
}
