use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Like, LikeIdentity, Post, PostCounter, Waifu};
use crate::error::RepoError;
use crate::validation::Page;

/// Operations every collection supports: lookup by identifier and insert-one.
///
/// Records are append-only from the service's point of view, so there is no
/// generic update or delete.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    /// Fails with `RepoError::Constraint` when a uniqueness rule is violated.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest first.
    async fn list_recent(&self, page: Page) -> Result<Vec<Post>, RepoError>;

    /// Newest first.
    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Post>, RepoError>;

    async fn count_by_user(&self, user_id: &str) -> Result<u64, RepoError>;

    /// Atomically add one to a counter and refresh `updated_at`.
    ///
    /// Returns the new counter value, or `RepoError::NotFound` if the post is gone.
    async fn increment_counter(&self, id: Uuid, counter: PostCounter) -> Result<i64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Newest first.
    async fn list_by_post(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>, RepoError>;
}

/// Like repository.
#[async_trait]
pub trait LikeRepository: BaseRepository<Like, Uuid> {
    /// Whether a like on `post_id` exists whose IP or session token matches `identity`.
    async fn exists_for_identity(
        &self,
        post_id: Uuid,
        identity: &LikeIdentity,
    ) -> Result<bool, RepoError>;
}

/// Waifu repository (read-only through the API).
#[async_trait]
pub trait WaifuRepository: BaseRepository<Waifu, Uuid> {
    /// Approved waifus only, newest first.
    async fn list_approved(&self, page: Page) -> Result<Vec<Waifu>, RepoError>;
}
