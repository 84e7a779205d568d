//! Comment handlers.

use actix_web::{HttpResponse, web};
use animoshi_core::services::NewComment;
use animoshi_core::validation::{Page, parse_id};
use animoshi_shared::dto::{CreateCommentRequest, PostCommentsQuery};

use super::required;
use crate::middleware::client_ip::ClientIp;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /postComments?postId=&limit=&offset=
pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<PostCommentsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let post_id = parse_id("postId", &required("postId", query.post_id)?)?;
    let page = Page::new(query.limit, query.offset)?;

    let comments = state.interactions.list_comments(post_id, page).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /comment
pub async fn create_comment(
    state: web::Data<AppState>,
    client_ip: ClientIp,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .interactions
        .create_comment(
            NewComment {
                post_id: req.post_id,
                user_id: req.user_id,
                text: req.text,
                recaptcha_token: req.recaptcha_token,
            },
            client_ip.as_str(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}
