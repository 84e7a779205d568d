//! Input sanitization and bounds checks for user-submitted fields.
//!
//! Everything here is pure: no I/O, no clocks. The check order inside each
//! `validate_*` function is fixed and the first violation wins.

use thiserror::Error;
use uuid::Uuid;

use crate::services::{NewComment, NewLike, NewPost};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_CONTENT_CHARS: usize = 500;
pub const MAX_IMAGE_CHARS: usize = 500;
pub const MAX_USER_ID_CHARS: usize = 128;

/// Largest page a list operation may request.
pub const MAX_PAGE_SIZE: u64 = 20;

/// Largest offset a list operation may request. Storage offsets are signed 64-bit.
pub const MAX_PAGE_OFFSET: u64 = i64::MAX as u64;

/// Upload size limit for post images, shared by every upload path.
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const SECURE_SCHEME: &str = "https://";

/// What was wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    Empty,
    TooLong { max: usize },
    InsecureScheme,
    Malformed,
    OutOfRange { min: u64, max: u64 },
    TooLarge { max_bytes: usize },
    UnsupportedType,
    /// Sent ahead of the human-verification token in a streamed form.
    BeforeToken,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Missing => f.write_str("is required"),
            Violation::Empty => f.write_str("must not be empty"),
            Violation::TooLong { max } => write!(f, "is too long (max {max} characters)"),
            Violation::InsecureScheme => write!(f, "must start with {SECURE_SCHEME}"),
            Violation::Malformed => f.write_str("is malformed"),
            Violation::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
            Violation::TooLarge { max_bytes } => {
                write!(f, "exceeds {} MiB", max_bytes / (1024 * 1024))
            }
            Violation::UnsupportedType => {
                f.write_str("has an invalid type, only JPG, PNG, WEBP and GIF are allowed")
            }
            Violation::BeforeToken => f.write_str("must come after recaptchaToken in the form"),
        }
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {violation}")]
pub struct ValidationError {
    pub field: &'static str,
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(field: &'static str, violation: Violation) -> Self {
        Self { field, violation }
    }
}

/// Strip angle brackets from user text.
///
/// This only defuses trivial markup; it is not an HTML sanitizer.
pub fn sanitize_text(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(field, Violation::TooLong { max }));
    }
    Ok(())
}

/// Parse an identifier supplied by a client.
pub fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::new(field, Violation::Missing));
    }
    Uuid::parse_str(raw).map_err(|_| ValidationError::new(field, Violation::Malformed))
}

pub fn validate_new_post(post: &NewPost) -> Result<(), ValidationError> {
    if post.title.is_empty() {
        return Err(ValidationError::new("title", Violation::Empty));
    }
    check_len("title", &post.title, MAX_TITLE_CHARS)?;
    check_len("content", &post.content, MAX_CONTENT_CHARS)?;
    validate_image_reference(&post.image)?;
    check_len("userId", &post.user_id, MAX_USER_ID_CHARS)
}

/// An empty reference is allowed; anything else must be a bounded https URL.
pub fn validate_image_reference(image: &str) -> Result<(), ValidationError> {
    check_len("image", image, MAX_IMAGE_CHARS)?;
    if !image.is_empty() && !image.starts_with(SECURE_SCHEME) {
        return Err(ValidationError::new("image", Violation::InsecureScheme));
    }
    Ok(())
}

/// Returns the parsed parent post id.
pub fn validate_new_comment(comment: &NewComment) -> Result<Uuid, ValidationError> {
    let post_id = parse_id("postId", &comment.post_id)?;
    check_len("text", &comment.text, MAX_CONTENT_CHARS)?;
    check_len("userId", &comment.user_id, MAX_USER_ID_CHARS)?;
    Ok(post_id)
}

/// Returns the parsed parent post id.
pub fn validate_new_like(like: &NewLike) -> Result<Uuid, ValidationError> {
    parse_id("postId", &like.post_id)
}

pub fn validate_upload(size: usize, content_type: &str) -> Result<(), ValidationError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::new(
            "file",
            Violation::TooLarge {
                max_bytes: MAX_UPLOAD_BYTES,
            },
        ));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ValidationError::new("file", Violation::UnsupportedType));
    }
    Ok(())
}

/// Offset/limit window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Both parameters are required, `limit` must be within `1..=MAX_PAGE_SIZE`
    /// and `offset` within `0..=MAX_PAGE_OFFSET`.
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Result<Self, ValidationError> {
        let limit = limit.ok_or_else(|| ValidationError::new("limit", Violation::Missing))?;
        let offset = offset.ok_or_else(|| ValidationError::new("offset", Violation::Missing))?;

        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ValidationError::new(
                "limit",
                Violation::OutOfRange {
                    min: 1,
                    max: MAX_PAGE_SIZE,
                },
            ));
        }

        if offset > MAX_PAGE_OFFSET {
            return Err(ValidationError::new(
                "offset",
                Violation::OutOfRange {
                    min: 0,
                    max: MAX_PAGE_OFFSET,
                },
            ));
        }

        Ok(Self { limit, offset })
    }
}
