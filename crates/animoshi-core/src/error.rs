//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostCounter;
use crate::validation::ValidationError;

/// External collaborator an interaction depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Document store holding posts, comments, likes and waifus.
    Store,
    /// Third-party human verification scoring service.
    Verifier,
    /// Blob storage for uploaded images.
    Media,
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dependency::Store => f.write_str("document store"),
            Dependency::Verifier => f.write_str("human verification service"),
            Dependency::Media => f.write_str("media storage"),
        }
    }
}

/// Why a human verification token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbuseReason {
    MissingToken,
    LowScore,
}

impl std::fmt::Display for AbuseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbuseReason::MissingToken => f.write_str("recaptcha token is required"),
            AbuseReason::LowScore => f.write_str("invalid recaptcha token"),
        }
    }
}

/// Terminal outcome of a rejected interaction request.
///
/// Every failure is scoped to the one request that produced it.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Abuse check rejected request: {0}")]
    AbuseRejected(AbuseReason),

    #[error("Duplicate action: post {post_id} was already liked by this identity")]
    DuplicateAction { post_id: Uuid },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{dependency} failure: {message}")]
    Dependency {
        dependency: Dependency,
        message: String,
    },

    #[error("{child} {child_id} recorded but {counter} counter of post {post_id} was not updated: {message}")]
    PartialConsistency {
        child: &'static str,
        child_id: Uuid,
        post_id: Uuid,
        counter: PostCounter,
        message: String,
    },
}

impl From<RepoError> for InteractionError {
    fn from(err: RepoError) -> Self {
        Self::Dependency {
            dependency: Dependency::Store,
            message: err.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
