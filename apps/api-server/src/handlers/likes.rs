//! Like handler.

use actix_web::{HttpResponse, web};
use animoshi_core::services::NewLike;
use animoshi_shared::dto::{LikePostRequest, LikeResponse};

use crate::middleware::client_ip::ClientIp;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /likePost
///
/// The session token travels as `aniToken`. The response leaves out the
/// stored IP and token.
pub async fn like_post(
    state: web::Data<AppState>,
    client_ip: ClientIp,
    body: web::Json<LikePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let like = state
        .interactions
        .create_like(
            NewLike {
                post_id: req.post_id,
                user_id: req.user_id,
                session_token: req.ani_token,
                recaptcha_token: req.recaptcha_token,
            },
            client_ip.as_str(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(LikeResponse {
        id: like.id,
        post_id: like.post_id,
        user_id: like.user_id,
        created_at: like.created_at,
        updated_at: like.updated_at,
    }))
}
