//! OpenAPI specification generated from handler annotations via utoipa.

use utoipa::OpenApi;

use super::response::ErrorBody;

/// Top-level OpenAPI document.
///
/// Each handler module contributes its paths and schemas through its own
/// `#[derive(OpenApi)]` struct, merged here at startup.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Zaitun API",
        description = "Backend for the Zaitun digital magazine: published content for readers and the editorial workflow.",
        version = "0.1.0"
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "health", description = "Liveness and dependency checks"),
        (name = "editions", description = "Published editions"),
        (name = "articles", description = "Published articles"),
        (name = "categories", description = "Categories of an edition"),
        (name = "images", description = "Image read-through from the object store"),
        (name = "admin", description = "Editorial lifecycle of editions and articles"),
        (name = "covers", description = "Cover uploads, thumbnails and relocation"),
        (name = "announcements", description = "Announcements (berita)"),
    ),
    components(schemas(ErrorBody))
)]
pub struct ApiDoc;

/// Build the merged OpenAPI document from all handler modules.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    use super::handlers;

    let mut doc = ApiDoc::openapi();
    doc.merge(handlers::health::HealthApiDoc::openapi());
    doc.merge(handlers::editions::EditionsApiDoc::openapi());
    doc.merge(handlers::articles::ArticlesApiDoc::openapi());
    doc.merge(handlers::categories::CategoriesApiDoc::openapi());
    doc.merge(handlers::images::ImagesApiDoc::openapi());
    doc.merge(handlers::admin_editions::AdminEditionsApiDoc::openapi());
    doc.merge(handlers::admin_articles::AdminArticlesApiDoc::openapi());
    doc.merge(handlers::covers::CoversApiDoc::openapi());
    doc.merge(handlers::writers::WritersApiDoc::openapi());
    doc.merge(handlers::announcements::AnnouncementsApiDoc::openapi());
    doc
}
