//! Read-through of stored images. Bytes are streamed with their stored
//! content type, not wrapped in the JSON envelope.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use utoipa::OpenApi;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::storage::asset_path::{ads_key, owner_key, AssetOwner};
use crate::validation::{parse_id, parse_year, IdKind};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/img/zaitun/editions/:year/:edition_id/:file_name",
            get(edition_image),
        )
        .route(
            "/img/zaitun/articles/:year/:article_id/:file_name",
            get(article_image),
        )
        .route("/ads/:year/:file_name", get(ad_image))
}

/// A decoded path segment must stay a single segment.
fn check_file_name(file_name: &str) -> Result<()> {
    if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
        return Err(AppError::invalid(
            "invalid file name",
            format!("'{}' is not a plain file name", file_name),
        ));
    }
    Ok(())
}

async fn serve(state: &SharedState, key: String) -> Result<Response> {
    let object = state.bounded(state.store.read(&key)).await?;
    tracing::debug!(key = %key, size = object.data.len(), "Serving stored image");
    Ok((
        [(header::CONTENT_TYPE, object.content_type)],
        object.data,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/img/zaitun/editions/{year}/{edition_id}/{file_name}",
    context_path = "/api",
    tag = "images",
    params(
        ("year" = i32, Path, description = "Edition year"),
        ("edition_id" = i64, Path, description = "Edition ID"),
        ("file_name" = String, Path, description = "Object file name")
    ),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 400, description = "Malformed path"),
        (status = 404, description = "Object not found")
    )
)]
pub async fn edition_image(
    State(state): State<SharedState>,
    Path((year, edition_id, file_name)): Path<(String, String, String)>,
) -> Result<Response> {
    let year = parse_year(&year)?;
    let edition_id = parse_id(&edition_id, IdKind::Edition)?;
    check_file_name(&file_name)?;
    serve(&state, owner_key(AssetOwner::Edition, year, edition_id, &file_name)).await
}

#[utoipa::path(
    get,
    path = "/img/zaitun/articles/{year}/{article_id}/{file_name}",
    context_path = "/api",
    tag = "images",
    params(
        ("year" = i32, Path, description = "Edition year"),
        ("article_id" = i64, Path, description = "Article ID"),
        ("file_name" = String, Path, description = "Object file name")
    ),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 400, description = "Malformed path"),
        (status = 404, description = "Object not found")
    )
)]
pub async fn article_image(
    State(state): State<SharedState>,
    Path((year, article_id, file_name)): Path<(String, String, String)>,
) -> Result<Response> {
    let year = parse_year(&year)?;
    let article_id = parse_id(&article_id, IdKind::Article)?;
    check_file_name(&file_name)?;
    serve(&state, owner_key(AssetOwner::Article, year, article_id, &file_name)).await
}

#[utoipa::path(
    get,
    path = "/ads/{year}/{file_name}",
    context_path = "/api",
    tag = "images",
    params(
        ("year" = i32, Path, description = "Campaign year"),
        ("file_name" = String, Path, description = "Object file name")
    ),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 400, description = "Malformed path"),
        (status = 404, description = "Object not found")
    )
)]
pub async fn ad_image(
    State(state): State<SharedState>,
    Path((year, file_name)): Path<(String, String)>,
) -> Result<Response> {
    let year = parse_year(&year)?;
    check_file_name(&file_name)?;
    serve(&state, ads_key(year, &file_name)).await
}

#[derive(OpenApi)]
#[openapi(paths(edition_image, article_image, ad_image))]
pub struct ImagesApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{send, state_with_store};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use bytes::Bytes;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_edition_image_is_streamed_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let (state, store) = state_with_store(dir.path());
        store
            .put("zaitun/editions/2024/3/cover.png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();

        let response = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/img/zaitun/editions/2024/3/cover.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_ad_image_served_from_ads_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let (state, store) = state_with_store(dir.path());
        store
            .put("ads/2023/banner.webp", Bytes::from_static(b"RIFF"))
            .await
            .unwrap();

        let (status, _) = send(
            router().with_state(state),
            Method::GET,
            "/ads/2023/banner.webp",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());

        let (status, body) = send(
            router().with_state(state),
            Method::GET,
            "/img/zaitun/articles/2024/9/nothing.jpg",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["data"]["error"], "storage: object not found");
    }

    #[tokio::test]
    async fn test_bad_article_id_is_rejected_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _) = state_with_store(dir.path());

        let (status, body) = send(
            router().with_state(state),
            Method::GET,
            "/img/zaitun/articles/2024/x9/a.jpg",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["error"], "invalid article id");
    }

    #[test]
    fn test_check_file_name() {
        assert!(check_file_name("cover.jpg").is_ok());
        assert!(check_file_name("").is_err());
        assert!(check_file_name("../etc/passwd").is_err());
    }
}
