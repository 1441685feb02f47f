//! Input validators shared by every handler.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};

/// Characters never allowed in an uploaded object's filename.
static FORBIDDEN_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\?%*:|"<>^]"#).expect("static regex"));

static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(png|jpe?g|webp)$").expect("static regex"));

static IMAGE_CONTENT_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^image/(png|jpe?g|webp)$").expect("static regex"));

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]+").expect("static regex"));

/// Minimum accepted edition year.
pub const MIN_EDITION_YEAR: i32 = 1970;

/// Identifier kinds, used to word parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Article,
    Edition,
    Category,
    Writer,
    Announcement,
}

impl IdKind {
    fn label(self) -> &'static str {
        match self {
            IdKind::Article => "article",
            IdKind::Edition => "edition",
            IdKind::Category => "category",
            IdKind::Writer => "writer",
            IdKind::Announcement => "announcement",
        }
    }
}

/// Parse a path or query identifier.
pub fn parse_id(raw: &str, kind: IdKind) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|e| AppError::invalid(format!("invalid {} id", kind.label()), e.to_string()))
}

/// Parse the `:year` segment of an image path.
pub fn parse_year(raw: &str) -> Result<i32> {
    raw.parse::<i32>()
        .map_err(|e| AppError::invalid("invalid year", e.to_string()))
}

pub fn validate_edition_year(year: i32) -> Result<()> {
    if year < MIN_EDITION_YEAR {
        return Err(AppError::invalid(
            "invalid edition year",
            format!("year must be >= {}", MIN_EDITION_YEAR),
        ));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_body(format!("{} is empty", field)));
    }
    Ok(())
}

pub fn has_image_extension(filename: &str) -> bool {
    IMAGE_EXTENSION.is_match(filename)
}

/// Reject names that could leave their owner's key prefix or need escaping.
fn check_filename_chars(field: &str, filename: &str) -> Result<()> {
    if FORBIDDEN_FILENAME_CHARS.is_match(filename) || filename.chars().any(char::is_control) {
        return Err(AppError::invalid(
            "invalid filename",
            format!(
                r#"{} must not contain / \ ? % * : | " < > ^ or control characters"#,
                field
            ),
        ));
    }
    Ok(())
}

/// Validate a filename and content type before issuing a signed upload URL.
pub fn validate_upload_request(filename: &str, content_type: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(AppError::invalid("invalid filename", "filename is empty"));
    }
    check_filename_chars("filename", filename)?;
    if !has_image_extension(filename) {
        return Err(AppError::invalid(
            "invalid file extension",
            "filename must end with .png, .jpg, .jpeg or .webp",
        ));
    }
    if !IMAGE_CONTENT_TYPE.is_match(content_type) {
        return Err(AppError::invalid(
            "invalid content type",
            "content type must be image/png, image/jpeg, image/jpg or image/webp",
        ));
    }
    Ok(())
}

/// Validate the new filename given to a cover rename.
pub fn validate_rename_filename(field: &str, filename: &str) -> Result<()> {
    require_non_empty(field, filename)?;
    if !has_image_extension(filename) {
        return Err(AppError::invalid(
            "invalid file extension",
            format!("{} must have extension (.png, .jpg, .jpeg, .webp)", field),
        ));
    }
    Ok(())
}

/// Validate the new filename of a cover that will be moved in the store.
///
/// The name becomes the last segment of the object key, so it gets the same
/// character rules as an upload.
pub fn validate_relocation_filename(field: &str, filename: &str) -> Result<()> {
    validate_rename_filename(field, filename)?;
    check_filename_chars(field, filename)
}

/// Derive a URL slug from a title: lowercase, strip everything but
/// `[a-z0-9]` and whitespace, then join the remaining words with `-`.
pub fn format_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Where the object named in a rename request lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameSource {
    /// Object already uploaded at its final key; only the pointer changes.
    GoogleCloud,
    /// Object must be moved to the new key.
    UserInput,
}

impl RenameSource {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "google-cloud" => Ok(RenameSource::GoogleCloud),
            "user-input" => Ok(RenameSource::UserInput),
            _ => Err(AppError::invalid(
                "invalid source field",
                "source must be either google-cloud or user-input",
            )),
        }
    }
}
