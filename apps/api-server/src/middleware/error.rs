//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use animoshi_core::error::{AbuseReason, Dependency, InteractionError};
use animoshi_core::validation::ValidationError;
use animoshi_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    /// The request could not be read at all (bad multipart body, wrong shape).
    BadRequest(String),
    Interaction(InteractionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Interaction(err) => write!(f, "{}", err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Interaction(err) => match err {
                InteractionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                InteractionError::AbuseRejected(_) => StatusCode::FORBIDDEN,
                InteractionError::DuplicateAction { .. } => StatusCode::CONFLICT,
                InteractionError::NotFound { .. } => StatusCode::NOT_FOUND,
                InteractionError::Dependency {
                    dependency: Dependency::Store,
                    ..
                } => StatusCode::INTERNAL_SERVER_ERROR,
                InteractionError::Dependency { .. } => StatusCode::SERVICE_UNAVAILABLE,
                InteractionError::PartialConsistency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Interaction(err) => interaction_body(err),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn interaction_body(err: &InteractionError) -> ErrorResponse {
    match err {
        InteractionError::InvalidInput(invalid) => {
            ErrorResponse::bad_request(invalid.to_string()).with_field(invalid.field)
        }
        InteractionError::AbuseRejected(reason) => {
            if *reason == AbuseReason::LowScore {
                tracing::warn!("Human verification rejected");
            }
            ErrorResponse::forbidden(reason.to_string())
        }
        InteractionError::DuplicateAction { .. } => {
            ErrorResponse::conflict("You have already liked this post")
        }
        InteractionError::NotFound { entity_type, .. } => {
            ErrorResponse::not_found(format!("{} not found", capitalize(entity_type)))
        }
        InteractionError::Dependency {
            dependency: Dependency::Store,
            message,
        } => {
            tracing::error!(%message, "Document store error");
            ErrorResponse::internal_error()
        }
        InteractionError::Dependency {
            dependency,
            message,
        } => {
            tracing::error!(%dependency, %message, "Dependency error");
            let detail = match dependency {
                Dependency::Media => "upload failed".to_string(),
                other => format!("{other} unavailable"),
            };
            ErrorResponse::service_unavailable(detail)
        }
        InteractionError::PartialConsistency { .. } => {
            tracing::error!(error = %err, "Partial write reached the HTTP layer");
            ErrorResponse::internal_error()
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<InteractionError> for AppError {
    fn from(err: InteractionError) -> Self {
        AppError::Interaction(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Interaction(InteractionError::InvalidInput(err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
