//! Application state - shared across all handlers.
//!
//! Every collaborator is constructed here once and handed to the service
//! that needs it; nothing is reachable through globals.

use std::sync::Arc;

use animoshi_core::ports::{MediaStore, VerifierError};
use animoshi_core::services::{InteractionService, Repositories};
use animoshi_infra::{DatabaseConfig, InMemoryStore, RecaptchaVerifier};

#[cfg(feature = "postgres")]
use animoshi_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use animoshi_infra::database::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresWaifuRepository,
};

#[cfg(feature = "rate-limit")]
use animoshi_core::ports::RateLimitError;
#[cfg(feature = "rate-limit")]
use animoshi_infra::InMemoryRateLimiter;

#[cfg(feature = "s3")]
use animoshi_infra::S3MediaStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub interactions: Arc<InteractionService>,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Arc<InMemoryRateLimiter>,
}

/// A collaborator that could not be built at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("human verifier: {0}")]
    Verifier(#[from] VerifierError),

    #[cfg(feature = "rate-limit")]
    #[error("rate limiter: {0}")]
    RateLimit(#[from] RateLimitError),
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let repos = repositories(config.database.as_ref()).await;

        if config.recaptcha.secret.is_empty() {
            tracing::warn!("RECAPTCHA_SECRET not set. Every verification will be refused.");
        }
        let verifier = Arc::new(RecaptchaVerifier::new(config.recaptcha.clone())?);

        let media = media_store(config).await;

        #[cfg(feature = "rate-limit")]
        let rate_limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())?);

        tracing::info!("Application state initialized");

        Ok(Self {
            interactions: Arc::new(InteractionService::new(repos, verifier, media)),
            #[cfg(feature = "rate-limit")]
            rate_limiter,
        })
    }
}

fn in_memory() -> Repositories {
    let store = Arc::new(InMemoryStore::new());
    Repositories {
        posts: store.clone(),
        comments: store.clone(),
        likes: store.clone(),
        waifus: store,
    }
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => Repositories {
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(connections.main.clone())),
            likes: Arc::new(PostgresLikeRepository::new(connections.main.clone())),
            waifus: Arc::new(PostgresWaifuRepository::new(connections.main)),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory repository");
    in_memory()
}

#[cfg(feature = "s3")]
async fn media_store(config: &AppConfig) -> Option<Arc<dyn MediaStore>> {
    match config.s3.clone() {
        Some(s3) => {
            tracing::info!(bucket = %s3.bucket, "Image uploads enabled");
            Some(Arc::new(S3MediaStore::from_config(s3).await))
        }
        None => {
            tracing::warn!("S3_BUCKET not set. Image uploads are disabled.");
            None
        }
    }
}

#[cfg(not(feature = "s3"))]
async fn media_store(_config: &AppConfig) -> Option<Arc<dyn MediaStore>> {
    tracing::info!("Running without s3 feature - image uploads are disabled");
    None
}
