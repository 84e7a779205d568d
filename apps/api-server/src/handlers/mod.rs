//! HTTP handlers and route configuration.

mod comments;
mod health;
mod likes;
mod posts;
mod waifus;

use actix_web::web;
use animoshi_core::validation::{ValidationError, Violation};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    // Health
    .route("/", web::get().to(health::root))
    .route("/health", web::get().to(health::health_check))
    // Posts
    .route("/post", web::get().to(posts::get_post))
    .route("/post", web::post().to(posts::create_post))
    .route("/posts", web::get().to(posts::list_posts))
    .route("/postsByUserId", web::get().to(posts::list_posts_by_user))
    .route("/postCountByUserId", web::get().to(posts::count_posts_by_user))
    // Comments
    .route("/postComments", web::get().to(comments::list_comments))
    .route("/comment", web::post().to(comments::create_comment))
    // Likes
    .route("/likePost", web::post().to(likes::like_post))
    // Waifus
    .route("/waifu", web::get().to(waifus::get_waifu))
    .route("/waifus", web::get().to(waifus::list_waifus));
}

/// A query parameter that must be present and non-blank.
fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::new(field, Violation::Missing)),
    }
}

#[cfg(test)]
mod tests;
