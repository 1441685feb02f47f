//! Cover uploads and relocation against a real database and an in-memory store.
//!
//! Requires PostgreSQL; see `common/mod.rs`. Run with `--ignored`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MemoryStore, TestContext};
use zaitun_backend::error::AppError;
use zaitun_backend::services::article_service::ArticleService;
use zaitun_backend::services::asset_service::AssetService;
use zaitun_backend::services::bounded;
use zaitun_backend::storage::asset_path::{AssetOwner, ThumbnailConvention, PLACEHOLDER_IMAGE};
use zaitun_backend::validation::RenameSource;

const EXPIRY: Duration = Duration::from_secs(180);

fn assets(ctx: &TestContext, store: &Arc<MemoryStore>, convention: ThumbnailConvention) -> AssetService {
    AssetService::new(ctx.pool.clone(), store.clone(), convention, EXPIRY)
}

/// Article in a 2024 edition whose cover and thumbnail exist in the store.
async fn article_with_cover(ctx: &TestContext, store: &MemoryStore) -> i64 {
    let edition_id = ctx.create_edition("Edisi Relokasi", 2024).await;
    let id = ArticleService::new(ctx.pool.clone())
        .create(edition_id)
        .await
        .unwrap();

    let cover = format!("zaitun/articles/2024/{}/old photo.png", id);
    let thumb = format!("zaitun/articles/2024/{}/thumb_old photo.jpg", id);
    store.put(&cover, b"cover");
    store.put(&thumb, b"thumb");
    ctx.set_article_images(
        id,
        &format!("/zaitun/articles/2024/{}/old%20photo.png", id),
        &format!("/zaitun/articles/2024/{}/thumb_old%20photo.jpg", id),
    )
    .await;
    id
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_placeholder_cover_cannot_be_renamed() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let edition_id = ctx.create_edition("Edisi Placeholder", 2024).await;
    let id = ArticleService::new(ctx.pool.clone())
        .create(edition_id)
        .await
        .unwrap();
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    // The new name's validity does not matter.
    for new_name in ["valid.png", "invalid.gif", ""] {
        let err = service
            .rename_cover(AssetOwner::Article, id, "newHeadline", new_name, RenameSource::UserInput)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::UnauthorizedOperation(_)),
            "{new_name}: {err:?}"
        );
    }

    let (cover, thumb) = ctx.article_images(id).await;
    assert_eq!(cover, PLACEHOLDER_IMAGE);
    assert_eq!(thumb, PLACEHOLDER_IMAGE);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_user_input_rename_moves_objects_and_columns() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    let outcome = service
        .rename_cover(AssetOwner::Article, id, "newHeadline", "fresh.png", RenameSource::UserInput)
        .await
        .unwrap();

    let new_cover = format!("/zaitun/articles/2024/{}/fresh.png", id);
    let new_thumb = format!("/zaitun/articles/2024/{}/thumb_fresh.jpg", id);
    assert_eq!(outcome.cover_img, new_cover);
    assert_eq!(outcome.thumbnail_img.as_deref(), Some(new_thumb.as_str()));
    assert_eq!(ctx.article_images(id).await, (new_cover, new_thumb));

    assert!(store.contains(&format!("zaitun/articles/2024/{}/fresh.png", id)));
    assert!(store.contains(&format!("zaitun/articles/2024/{}/thumb_fresh.jpg", id)));
    assert!(!store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));
    assert!(!store.contains(&format!("zaitun/articles/2024/{}/thumb_old photo.jpg", id)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_failed_thumbnail_move_keeps_original_paths() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let before = ctx.article_images(id).await;
    store.fail_moves_to(&format!("zaitun/articles/2024/{}/thumb_fresh.jpg", id));
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    let err = service
        .rename_cover(AssetOwner::Article, id, "newHeadline", "fresh.png", RenameSource::UserInput)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)), "{err:?}");

    assert_eq!(ctx.article_images(id).await, before);
    // The cover was moved back to where the row still points.
    assert!(store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));
    assert!(!store.contains(&format!("zaitun/articles/2024/{}/fresh.png", id)));
    assert!(store.contains(&format!("zaitun/articles/2024/{}/thumb_old photo.jpg", id)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_abandoned_rename_still_leaves_row_and_store_in_step() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    store.delay_moves_to(
        &format!("zaitun/articles/2024/{}/thumb_fresh.jpg", id),
        Duration::from_secs(2),
    );
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    // The deadline expires while the thumbnail move is still pending.
    let err = bounded(
        Duration::from_millis(300),
        service.rename_cover(AssetOwner::Article, id, "newHeadline", "fresh.png", RenameSource::UserInput),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Timeout), "{err:?}");

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(
        ctx.article_images(id).await,
        (
            format!("/zaitun/articles/2024/{}/fresh.png", id),
            format!("/zaitun/articles/2024/{}/thumb_fresh.jpg", id),
        )
    );
    assert!(store.contains(&format!("zaitun/articles/2024/{}/fresh.png", id)));
    assert!(store.contains(&format!("zaitun/articles/2024/{}/thumb_fresh.jpg", id)));
    assert!(!store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));
    assert!(!store.contains(&format!("zaitun/articles/2024/{}/thumb_old photo.jpg", id)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_rename_cannot_escape_owner_prefix() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let before = ctx.article_images(id).await;
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    for new_name in ["../999/x.png", "nested/x.png", "x%2F.png"] {
        let err = service
            .rename_cover(AssetOwner::Article, id, "newHeadline", new_name, RenameSource::UserInput)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }), "{new_name}: {err:?}");
    }

    assert_eq!(ctx.article_images(id).await, before);
    assert!(store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));
    assert!(store.contains(&format!("zaitun/articles/2024/{}/thumb_old photo.jpg", id)));
    assert!(!store.contains("zaitun/articles/2024/999/x.png"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_rename_onto_existing_object_is_refused() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let before = ctx.article_images(id).await;
    let taken = format!("zaitun/articles/2024/{}/taken.png", id);
    store.put(&taken, b"someone else");
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    let err = service
        .rename_cover(AssetOwner::Article, id, "newHeadline", "taken.png", RenameSource::UserInput)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)), "{err:?}");

    assert_eq!(ctx.article_images(id).await, before);
    assert!(store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));
    assert_eq!(store.read_bytes(&taken).as_deref(), Some(&b"someone else"[..]));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_missing_source_object_keeps_original_paths() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let edition_id = ctx.create_edition("Edisi Hilang", 2024).await;
    let id = ArticleService::new(ctx.pool.clone())
        .create(edition_id)
        .await
        .unwrap();
    ctx.set_article_images(
        id,
        &format!("/zaitun/articles/2024/{}/gone.png", id),
        &format!("/zaitun/articles/2024/{}/thumb_gone.jpg", id),
    )
    .await;
    let before = ctx.article_images(id).await;

    let err = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg)
        .rename_cover(AssetOwner::Article, id, "newHeadline", "new.png", RenameSource::UserInput)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ObjectNotFound(_)), "{err:?}");
    assert_eq!(ctx.article_images(id).await, before);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_edition_rename_with_webp_thumbnails() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let edition_id = ctx.create_edition("Edisi Sampul", 2023).await;
    store.put(&format!("zaitun/editions/2023/{}/a.jpg", edition_id), b"c");
    store.put(&format!("zaitun/editions/2023/{}/a_thumb.webp", edition_id), b"t");
    sqlx::query("UPDATE editions SET cover_img = $2, thumb_img = $3 WHERE id = $1")
        .bind(edition_id)
        .bind(format!("/zaitun/editions/2023/{}/a.jpg", edition_id))
        .bind(format!("/zaitun/editions/2023/{}/a_thumb.webp", edition_id))
        .execute(&ctx.pool)
        .await
        .unwrap();

    let service = assets(&ctx, &store, ThumbnailConvention::SuffixedWebp);
    service
        .rename_cover(AssetOwner::Edition, edition_id, "newCover", "b.jpeg", RenameSource::UserInput)
        .await
        .unwrap();

    let paths = service.cover_paths(AssetOwner::Edition, edition_id).await.unwrap();
    assert_eq!(paths.cover_img, format!("/zaitun/editions/2023/{}/b.jpeg", edition_id));
    assert_eq!(
        paths.thumbnail_img,
        format!("/zaitun/editions/2023/{}/b_thumb.webp", edition_id)
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_google_cloud_rename_only_repoints() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let (_, thumb_before) = ctx.article_images(id).await;
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    let uploaded = format!("/zaitun/articles/2024/{}/uploaded.webp", id);
    service
        .rename_cover(AssetOwner::Article, id, "newHeadline", &uploaded, RenameSource::GoogleCloud)
        .await
        .unwrap();

    assert_eq!(ctx.article_images(id).await, (uploaded, thumb_before));
    // Nothing moved.
    assert!(store.contains(&format!("zaitun/articles/2024/{}/old photo.png", id)));

    let err = service
        .rename_cover(AssetOwner::Article, i64::MAX, "newHeadline", "x.png", RenameSource::GoogleCloud)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_url_uses_owner_year() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let edition_id = ctx.create_edition("Edisi Unggah", 2022).await;
    let id = ArticleService::new(ctx.pool.clone())
        .create(edition_id)
        .await
        .unwrap();
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    let ticket = service
        .issue_upload_url(AssetOwner::Article, id, "cover.webp", "image/webp")
        .await
        .unwrap();
    assert_eq!(ticket.location, format!("zaitun/articles/2022/{}/cover.webp", id));
    assert!(ticket.url.contains("content-type=image/webp"));

    let err = service
        .issue_upload_url(AssetOwner::Edition, i64::MAX, "cover.webp", "image/webp")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_thumbnail_pointer() {
    let ctx = TestContext::new().await;
    let store = MemoryStore::new();
    let id = article_with_cover(&ctx, &store).await;
    let service = assets(&ctx, &store, ThumbnailConvention::PrefixedJpg);

    service
        .update_thumbnail(AssetOwner::Article, id, "/zaitun/articles/2024/custom.jpg")
        .await
        .unwrap();
    let (_, thumb) = ctx.article_images(id).await;
    assert_eq!(thumb, "/zaitun/articles/2024/custom.jpg");

    assert!(matches!(
        service.update_thumbnail(AssetOwner::Article, id, " ").await,
        Err(AppError::InvalidInput { .. })
    ));
    assert!(matches!(
        service
            .update_thumbnail(AssetOwner::Article, i64::MAX, "x.jpg")
            .await,
        Err(AppError::NotFound { .. })
    ));
}
