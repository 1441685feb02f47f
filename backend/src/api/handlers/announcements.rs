//! Announcement ("berita") endpoints: the reader-facing listing and the
//! admin management routes.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::extract::JsonBody;
use crate::api::response::{ApiResponse, MessageBody};
use crate::api::SharedState;
use crate::error::Result;
use crate::models::announcement::{Announcement, AnnouncementDetail, AnnouncementSummary};
use crate::services::announcement_service::{parse_publish_window, NewAnnouncement};
use crate::validation::{parse_id, IdKind};

/// Reader-facing routes, mounted under `/api`.
pub fn public_router() -> Router<SharedState> {
    Router::new()
        .route("/announcements", get(published_announcements))
        .route("/announcements/:announcement_id", get(get_announcement))
}

/// Admin routes, mounted under `/api/core`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/announcements", get(list_announcements))
        .route("/announcement", post(create_announcement))
        .route("/announcements/:announcement_id", delete(delete_announcement))
        .route(
            "/announcements/:announcement_id/publishing",
            put(update_publishing),
        )
        .route(
            "/announcements/:announcement_id/thumbnail",
            put(update_thumbnail),
        )
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub section: String,
    pub descriptions: String,
    #[serde(default)]
    pub details: String,
    /// RFC 3339 timestamp
    pub publish_start: String,
    /// RFC 3339 timestamp
    pub publish_end: String,
    /// File name of the thumbnail to upload
    pub thumb_img: String,
    pub content_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAnnouncementResponse {
    pub id: i64,
    pub url: String,
    pub location: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishingRequest {
    /// RFC 3339 timestamp
    pub publish_start: String,
    /// RFC 3339 timestamp
    pub publish_end: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailPathRequest {
    /// Object path of the uploaded thumbnail
    pub obj_path: String,
}

#[utoipa::path(
    get,
    path = "/announcements",
    context_path = "/api",
    tag = "announcements",
    responses((status = 200, description = "Announcements inside their publishing window, latest first", body = [AnnouncementSummary]))
)]
pub async fn published_announcements(
    State(state): State<SharedState>,
) -> Result<ApiResponse<Vec<AnnouncementSummary>>> {
    let items = state
        .bounded(state.announcement_service().published())
        .await?;
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    get,
    path = "/announcements/{announcement_id}",
    context_path = "/api",
    tag = "announcements",
    params(("announcement_id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement", body = AnnouncementDetail),
        (status = 400, description = "Invalid announcement ID"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn get_announcement(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<AnnouncementDetail>> {
    let id = parse_id(&id, IdKind::Announcement)?;
    let item = state
        .bounded(state.announcement_service().detail(id))
        .await?;
    Ok(ApiResponse::ok(item))
}

#[utoipa::path(
    get,
    path = "/announcements",
    context_path = "/api/core",
    tag = "announcements",
    responses((status = 200, description = "Announcements, newest first", body = [Announcement]))
)]
pub async fn list_announcements(
    State(state): State<SharedState>,
) -> Result<ApiResponse<Vec<Announcement>>> {
    let items = state
        .bounded(state.announcement_service().list())
        .await?;
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    post,
    path = "/announcement",
    context_path = "/api/core",
    tag = "announcements",
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Announcement created; upload the thumbnail to `url`", body = CreateAnnouncementResponse),
        (status = 400, description = "Missing fields, bad window or bad image")
    )
)]
pub async fn create_announcement(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreateAnnouncementRequest>,
) -> Result<ApiResponse<CreateAnnouncementResponse>> {
    tracing::debug!(title = %payload.title, section = %payload.section, "Create announcement request");
    let (publish_start, publish_end) =
        parse_publish_window(&payload.publish_start, &payload.publish_end)?;

    let created = state
        .bounded(state.announcement_service().create(NewAnnouncement {
            title: payload.title,
            section: payload.section,
            descriptions: payload.descriptions,
            details: payload.details,
            publish_start,
            publish_end,
            file_name: payload.thumb_img,
            content_type: payload.content_type,
        }))
        .await?;

    Ok(ApiResponse::created(CreateAnnouncementResponse {
        id: created.id,
        url: created.url,
        location: created.location,
    }))
}

#[utoipa::path(
    put,
    path = "/announcements/{announcement_id}/publishing",
    context_path = "/api/core",
    tag = "announcements",
    params(("announcement_id" = i64, Path, description = "Announcement ID")),
    request_body = PublishingRequest,
    responses(
        (status = 200, description = "Publishing window updated", body = MessageBody),
        (status = 400, description = "Bad timestamps or reversed window"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn update_publishing(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PublishingRequest>,
) -> Result<ApiResponse<MessageBody>> {
    let id = parse_id(&id, IdKind::Announcement)?;
    let (start, end) = parse_publish_window(&payload.publish_start, &payload.publish_end)?;

    state
        .bounded(state.announcement_service().update_publishing(id, start, end))
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Publishing window updated successfully")))
}

#[utoipa::path(
    put,
    path = "/announcements/{announcement_id}/thumbnail",
    context_path = "/api/core",
    tag = "announcements",
    params(("announcement_id" = i64, Path, description = "Announcement ID")),
    request_body = ThumbnailPathRequest,
    responses(
        (status = 200, description = "Thumbnail pointer updated", body = MessageBody),
        (status = 400, description = "Invalid ID or empty object path"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn update_thumbnail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ThumbnailPathRequest>,
) -> Result<ApiResponse<MessageBody>> {
    let id = parse_id(&id, IdKind::Announcement)?;
    state
        .bounded(
            state
                .announcement_service()
                .update_thumbnail(id, &payload.obj_path),
        )
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Thumbnail updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/announcements/{announcement_id}",
    context_path = "/api/core",
    tag = "announcements",
    params(("announcement_id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = MessageBody),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn delete_announcement(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<MessageBody>> {
    let id = parse_id(&id, IdKind::Announcement)?;
    state
        .bounded(state.announcement_service().delete(id))
        .await?;
    Ok(ApiResponse::ok(MessageBody::new("Announcement deleted successfully")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        published_announcements,
        get_announcement,
        list_announcements,
        create_announcement,
        update_publishing,
        update_thumbnail,
        delete_announcement,
    ),
    components(schemas(
        Announcement,
        AnnouncementSummary,
        AnnouncementDetail,
        ThumbnailPathRequest,
        CreateAnnouncementRequest,
        CreateAnnouncementResponse,
        PublishingRequest,
        MessageBody,
    ))
)]
pub struct AnnouncementsApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{send, state_with_store};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn create_body() -> serde_json::Value {
        json!({
            "title": "Misa Paskah",
            "section": "Paroki",
            "descriptions": "Jadwal misa",
            "details": "",
            "publishStart": "2024-03-01T00:00:00Z",
            "publishEnd": "2024-04-01T00:00:00Z",
            "thumbImg": "paskah.jpg",
            "contentType": "image/jpeg"
        })
    }

    #[tokio::test]
    async fn test_create_rejects_reversed_window() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());
        let mut body = create_body();
        body["publishStart"] = json!("2024-05-01T00:00:00Z");

        let (status, resp) =
            send(router().with_state(state), Method::POST, "/announcement", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["data"]["error"], "invalid publishing window");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_thumbnail_type() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());
        let mut body = create_body();
        body["contentType"] = json!("application/pdf");

        let (status, resp) =
            send(router().with_state(state), Method::POST, "/announcement", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["data"]["error"], "invalid content type");
    }

    #[tokio::test]
    async fn test_publishing_rejects_non_rfc3339() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());

        let (status, resp) = send(
            router().with_state(state),
            Method::PUT,
            "/announcements/5/publishing",
            Some(json!({ "publishStart": "01/03/2024", "publishEnd": "2024-04-01T00:00:00Z" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(resp["data"]["error"].as_str().unwrap().contains("publishStart"));
    }

    #[tokio::test]
    async fn test_public_detail_rejects_bad_id() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());

        let (status, resp) = send(
            public_router().with_state(state),
            Method::GET,
            "/announcements/berita-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["data"]["error"], "invalid announcement id");
    }

    #[tokio::test]
    async fn test_thumbnail_rejects_empty_object_path() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());

        let (status, resp) = send(
            router().with_state(state.clone()),
            Method::PUT,
            "/announcements/5/thumbnail",
            Some(json!({ "objPath": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["data"]["error"], "invalid request body");
        assert_eq!(resp["data"]["details"], "empty object path");

        let (status, resp) = send(
            router().with_state(state),
            Method::PUT,
            "/announcements/x/thumbnail",
            Some(json!({ "objPath": "/zaitun/announcements/5/a.jpg" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["data"]["error"], "invalid announcement id");
    }
}
