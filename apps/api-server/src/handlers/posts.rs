//! Post handlers.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::StreamExt;

use animoshi_core::ports::Upload;
use animoshi_core::services::{NewPost, require_token};
use animoshi_core::validation::{MAX_UPLOAD_BYTES, Page, ValidationError, Violation, parse_id};
use animoshi_shared::dto::{IdQuery, PageQuery, UserPageQuery, UserQuery};

use super::required;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Ceiling for any non-file form field.
const MAX_FORM_FIELD_BYTES: usize = 16 * 1024;

/// GET /post?id=
pub async fn get_post(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    let raw = required("id", query.into_inner().id)?;
    let post = state.interactions.get_post(parse_id("id", &raw)?).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /posts?limit=&offset=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.limit, query.offset)?;
    let posts = state.interactions.list_posts(page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /postsByUserId?userId=&limit=&offset=
pub async fn list_posts_by_user(
    state: web::Data<AppState>,
    query: web::Query<UserPageQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let user_id = required("userId", query.user_id)?;
    let page = Page::new(query.limit, query.offset)?;

    let posts = state.interactions.list_posts_by_user(&user_id, page).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /postCountByUserId?userId=
pub async fn count_posts_by_user(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> AppResult<HttpResponse> {
    let user_id = required("userId", query.into_inner().user_id)?;
    let count = state.interactions.count_posts_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(count))
}

/// POST /post (multipart/form-data)
///
/// The token presence check runs before any form-shape error is reported.
pub async fn create_post(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload).await;

    require_token(&form.post.recaptcha_token)?;
    if let Some(detail) = form.malformed {
        return Err(AppError::BadRequest(detail));
    }
    if form.file_before_token {
        return Err(ValidationError::new("file", Violation::BeforeToken).into());
    }

    let post = state
        .interactions
        .create_post(form.post, form.upload)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// What was read from a create-post form.
#[derive(Default)]
struct PostForm {
    post: NewPost,
    upload: Option<Upload>,
    /// A non-empty file part arrived before a non-blank token and was drained unbuffered.
    file_before_token: bool,
    /// First structural problem; reading stops there.
    malformed: Option<String>,
}

async fn read_post_form(mut payload: Multipart) -> PostForm {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                form.malformed = Some(e.to_string());
                break;
            }
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let token_seen = !form.post.recaptcha_token.trim().is_empty();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("upload")
                .to_string();
            let content_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_default();

            match read_file(&mut field, token_seen).await {
                // No file picked.
                Ok((_, 0)) => {}
                Ok(_) if !token_seen => form.file_before_token = true,
                Ok((bytes, _)) => {
                    form.upload = Some(Upload {
                        filename,
                        content_type,
                        bytes,
                    })
                }
                Err(detail) => {
                    form.malformed = Some(detail);
                    break;
                }
            }
            continue;
        }

        let value = match read_text(&mut field, &name).await {
            Ok(value) => value,
            Err(detail) => {
                form.malformed = Some(detail);
                break;
            }
        };
        match name.as_str() {
            "title" => form.post.title = value,
            "content" => form.post.content = value,
            "image" => form.post.image = value,
            "nsfwToggle" => form.post.nsfw = parse_flag(&value),
            "userId" => form.post.user_id = value,
            "recaptchaToken" => form.post.recaptcha_token = value,
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    form
}

/// Buffers at most one byte past the upload limit and drains the rest.
/// With `keep` unset nothing is buffered. Also returns the full part size.
async fn read_file(field: &mut Field, keep: bool) -> Result<(Vec<u8>, usize), String> {
    let mut bytes = Vec::new();
    let mut total = 0;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        total += chunk.len();
        if !keep {
            continue;
        }
        let room = (MAX_UPLOAD_BYTES + 1).saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok((bytes, total))
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        if bytes.len() + chunk.len() > MAX_FORM_FIELD_BYTES {
            return Err(format!("form field {name} is too large"));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| format!("form field {name} is not valid UTF-8"))
}

/// `1`/`true`/`on` set the flag; anything else leaves it unset.
fn parse_flag(raw: &str) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => true,
        "" | "0" | "false" | "off" => false,
        other => {
            tracing::debug!(value = other, "Unparseable nsfwToggle, treating as unset");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("maybe"));
    }
}
