//! Interaction orchestrator: create post, create comment, create like.
//!
//! Each request moves through the same short-circuiting pipeline:
//! gate check, validation, (likes only) duplicate check, child insert,
//! counter increment. The first failing step decides the error.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Like, LikeIdentity, Post, PostCounter};
use crate::error::{Dependency, InteractionError, RepoError};
use crate::ports::{
    CommentRepository, HumanVerifier, LikeRepository, MediaError, MediaStore, PostRepository,
    Upload, WaifuRepository,
};
use crate::validation::{self, sanitize_text};

use super::counters::CounterUpdater;
use super::duplicates::DuplicateDetector;
use super::gate::BotGate;

/// Submitted post fields, as received from the client.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image: String,
    pub nsfw: bool,
    pub user_id: String,
    pub recaptcha_token: String,
}

/// Submitted comment fields, as received from the client.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    pub recaptcha_token: String,
}

/// Submitted like fields, as received from the client.
#[derive(Debug, Clone, Default)]
pub struct NewLike {
    pub post_id: String,
    /// Accepted for compatibility and ignored: likes are always stored as anonymous.
    pub user_id: String,
    pub session_token: Option<String>,
    pub recaptcha_token: String,
}

/// The document store collections the service works against.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub waifus: Arc<dyn WaifuRepository>,
}

/// Gates and records every mutating user action and serves the read side.
pub struct InteractionService {
    pub(super) posts: Arc<dyn PostRepository>,
    pub(super) comments: Arc<dyn CommentRepository>,
    pub(super) likes: Arc<dyn LikeRepository>,
    pub(super) waifus: Arc<dyn WaifuRepository>,
    gate: BotGate,
    duplicates: DuplicateDetector,
    counters: CounterUpdater,
    media: Option<Arc<dyn MediaStore>>,
}

impl InteractionService {
    pub fn new(
        repos: Repositories,
        verifier: Arc<dyn HumanVerifier>,
        media: Option<Arc<dyn MediaStore>>,
    ) -> Self {
        Self {
            gate: BotGate::new(verifier),
            duplicates: DuplicateDetector::new(repos.likes.clone()),
            counters: CounterUpdater::new(repos.posts.clone()),
            posts: repos.posts,
            comments: repos.comments,
            likes: repos.likes,
            waifus: repos.waifus,
            media,
        }
    }

    /// Create a post. An uploaded file is only used when no image URL was given.
    pub async fn create_post(
        &self,
        new: NewPost,
        upload: Option<Upload>,
    ) -> Result<Post, InteractionError> {
        self.gate.check(&new.recaptcha_token).await?;
        validation::validate_new_post(&new)?;

        let image = match upload {
            Some(upload) if new.image.is_empty() => self.store_upload(upload).await?,
            Some(upload) => {
                tracing::debug!(
                    filename = %upload.filename,
                    "Image URL supplied, ignoring uploaded file"
                );
                new.image
            }
            None => new.image,
        };

        let post = Post::new(
            sanitize_text(&new.title),
            sanitize_text(&new.content),
            image,
            new.nsfw,
            sanitize_text(&new.user_id),
        );

        let post = self.posts.insert(post).await?;
        tracing::info!(post_id = %post.id, user_id = %post.user_id, "Post created");

        Ok(post)
    }

    /// Create a comment on an existing post and bump its comment counter.
    pub async fn create_comment(
        &self,
        new: NewComment,
        client_ip: &str,
    ) -> Result<Comment, InteractionError> {
        self.gate.check(&new.recaptcha_token).await?;
        let post_id = validation::validate_new_comment(&new)?;
        self.require_post(post_id).await?;

        let comment = Comment::new(
            post_id,
            sanitize_text(&new.user_id),
            sanitize_text(&new.text),
            client_ip.to_string(),
        );

        let comment = self.comments.insert(comment).await?;
        tracing::info!(%post_id, comment_id = %comment.id, "Comment created");

        self.bump_counter(post_id, PostCounter::Comments, "comment", comment.id)
            .await;

        Ok(comment)
    }

    /// Record a like at most once per IP and per session token, then bump the like counter.
    pub async fn create_like(&self, new: NewLike, client_ip: &str) -> Result<Like, InteractionError> {
        self.gate.check(&new.recaptcha_token).await?;
        let post_id = validation::validate_new_like(&new)?;
        self.require_post(post_id).await?;

        let session_token = new.session_token.filter(|t| !t.trim().is_empty());
        let like = Like::new(post_id, client_ip.to_string(), session_token);

        let identity = LikeIdentity::from(&like);
        if self.duplicates.has_prior_like(post_id, &identity).await? {
            tracing::info!(%post_id, client_ip, "Repeat like rejected");
            return Err(InteractionError::DuplicateAction { post_id });
        }

        let like = match self.likes.insert(like).await {
            Ok(like) => like,
            Err(RepoError::Constraint(detail)) => {
                tracing::info!(%post_id, client_ip, %detail, "Repeat like rejected by store");
                return Err(InteractionError::DuplicateAction { post_id });
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(%post_id, like_id = %like.id, "Like recorded");

        self.bump_counter(post_id, PostCounter::Likes, "like", like.id)
            .await;

        Ok(like)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post, InteractionError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(InteractionError::NotFound {
                entity_type: "post",
                id: post_id,
            })
    }

    async fn store_upload(&self, upload: Upload) -> Result<String, InteractionError> {
        validation::validate_upload(upload.bytes.len(), &upload.content_type)?;

        let media = self.media.as_ref().ok_or_else(|| media_failure(MediaError::NotConfigured))?;
        let url = media.upload(upload).await.map_err(media_failure)?;
        tracing::debug!(%url, "Image uploaded");

        Ok(url)
    }

    /// The child record is already durable here. A failed increment leaves the
    /// aggregate stale; it is logged and the interaction still succeeds.
    async fn bump_counter(
        &self,
        post_id: Uuid,
        counter: PostCounter,
        child: &'static str,
        child_id: Uuid,
    ) {
        if let Err(e) = self.counters.increment(post_id, counter).await {
            let err = InteractionError::PartialConsistency {
                child,
                child_id,
                post_id,
                counter,
                message: e.to_string(),
            };
            tracing::warn!(%post_id, %counter, error = %err, "Post counter is stale");
        }
    }
}

fn media_failure(err: MediaError) -> InteractionError {
    tracing::error!(error = %err, "Image upload failed");
    InteractionError::Dependency {
        dependency: Dependency::Media,
        message: "upload failed".to_string(),
    }
}
