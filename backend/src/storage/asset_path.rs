//! Object key layout for magazine images.
//!
//! Cover images live under `zaitun/{articles|editions}/{year}/{owner_id}/{file}`.
//! Database columns hold the same key with a leading `/` and may contain
//! percent-encoded characters; object keys never do.
//!
//! Each cover has a derived thumbnail whose name depends on the configured
//! convention:
//! - `prefixed-jpg`: `thumb_{base}.jpg` (default)
//! - `suffixed-webp`: `{base}_thumb.webp`

use std::fmt;

use crate::error::{AppError, Result};

/// Shared image assigned to new content until a real cover is uploaded.
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.jpg";

const ROOT_NAMESPACE: &str = "zaitun";

/// Content kind that owns a cover image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOwner {
    Article,
    Edition,
}

impl AssetOwner {
    pub fn namespace(self) -> &'static str {
        match self {
            AssetOwner::Article => "articles",
            AssetOwner::Edition => "editions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetOwner::Article => "article",
            AssetOwner::Edition => "edition",
        }
    }
}

/// Naming rule for a cover's derived thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailConvention {
    #[default]
    PrefixedJpg,
    SuffixedWebp,
}

impl ThumbnailConvention {
    pub fn thumbnail_name(self, base: &str) -> String {
        match self {
            Self::PrefixedJpg => format!("thumb_{}.jpg", base),
            Self::SuffixedWebp => format!("{}_thumb.webp", base),
        }
    }
}

impl fmt::Display for ThumbnailConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrefixedJpg => write!(f, "prefixed-jpg"),
            Self::SuffixedWebp => write!(f, "suffixed-webp"),
        }
    }
}

impl std::str::FromStr for ThumbnailConvention {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "prefixed-jpg" | "jpg" => Ok(Self::PrefixedJpg),
            "suffixed-webp" | "webp" => Ok(Self::SuffixedWebp),
            other => Err(AppError::Config(format!(
                "unknown THUMBNAIL_CONVENTION '{}'",
                other
            ))),
        }
    }
}

/// Filename without its last extension. `a.b.png` becomes `a.b`.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((base, _)) => base,
        None => filename,
    }
}

/// Object key for a file owned by an article or edition.
pub fn owner_key(owner: AssetOwner, year: i32, owner_id: i64, filename: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        ROOT_NAMESPACE,
        owner.namespace(),
        year,
        owner_id,
        filename
    )
}

pub fn ads_key(year: i32, filename: &str) -> String {
    format!("ads/{}/{}", year, filename)
}

pub fn announcement_key(announcement_id: i64, filename: &str) -> String {
    format!("berita/{}/{}", announcement_id, filename)
}

/// Turn a stored column value (`/zaitun/...`, possibly percent-encoded) into
/// an object key.
pub fn key_from_column(column: &str) -> Result<String> {
    let trimmed = column.strip_prefix('/').unwrap_or(column);
    urlencoding::decode(trimmed)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AppError::Internal(format!("failed to decode object path '{}': {}", column, e)))
}

pub fn column_from_key(key: &str) -> String {
    format!("/{}", key)
}

pub fn ensure_not_placeholder(cover: &str, thumb: &str) -> Result<()> {
    if cover == PLACEHOLDER_IMAGE || thumb == PLACEHOLDER_IMAGE {
        return Err(AppError::UnauthorizedOperation(
            "cannot modify default object".to_string(),
        ));
    }
    Ok(())
}

/// Old and new locations of a cover and its thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub old_cover_key: String,
    pub old_thumb_key: String,
    pub new_cover_key: String,
    pub new_thumb_key: String,
    pub new_cover_column: String,
    pub new_thumb_column: String,
}

/// Compute where a renamed cover and its thumbnail will live.
///
/// Fails with `UnauthorizedOperation` when either current path is the shared
/// placeholder: placeholders are replaced through upload, never renamed.
pub fn plan_relocation(
    owner: AssetOwner,
    year: i32,
    owner_id: i64,
    current_cover: &str,
    current_thumb: &str,
    new_filename: &str,
    convention: ThumbnailConvention,
) -> Result<RelocationPlan> {
    ensure_not_placeholder(current_cover, current_thumb)?;

    let base = strip_extension(new_filename);
    let raw_cover = owner_key(owner, year, owner_id, new_filename);
    let raw_thumb = owner_key(owner, year, owner_id, &convention.thumbnail_name(base));

    Ok(RelocationPlan {
        old_cover_key: key_from_column(current_cover)?,
        old_thumb_key: key_from_column(current_thumb)?,
        new_cover_key: key_from_column(&raw_cover)?,
        new_thumb_key: key_from_column(&raw_thumb)?,
        new_cover_column: column_from_key(&raw_cover),
        new_thumb_column: column_from_key(&raw_thumb),
    })
}
