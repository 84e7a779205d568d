//! Denormalized counter maintenance on posts.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostCounter;
use crate::error::RepoError;
use crate::ports::PostRepository;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Parent post {0} not found")]
    ParentNotFound(Uuid),

    #[error(transparent)]
    Store(RepoError),
}

/// Bumps a post's aggregate counter after a child record has been persisted.
///
/// The increment is delegated to the store as a single atomic delta, so
/// concurrent interactions on the same post do not lose updates.
pub struct CounterUpdater {
    posts: Arc<dyn PostRepository>,
}

impl CounterUpdater {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Returns the new counter value.
    pub async fn increment(&self, post_id: Uuid, counter: PostCounter) -> Result<i64, CounterError> {
        match self.posts.increment_counter(post_id, counter).await {
            Ok(value) => {
                tracing::debug!(%post_id, %counter, value, "Post counter incremented");
                Ok(value)
            }
            Err(RepoError::NotFound) => Err(CounterError::ParentNotFound(post_id)),
            Err(e) => Err(CounterError::Store(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use crate::ports::BaseRepository;
    use crate::validation::Page;
    use async_trait::async_trait;

    struct NoPosts;

    #[async_trait]
    impl BaseRepository<Post, Uuid> for NoPosts {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(None)
        }

        async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
            Ok(entity)
        }
    }

    #[async_trait]
    impl PostRepository for NoPosts {
        async fn list_recent(&self, _page: Page) -> Result<Vec<Post>, RepoError> {
            Ok(Vec::new())
        }

        async fn list_by_user(&self, _user_id: &str, _page: Page) -> Result<Vec<Post>, RepoError> {
            Ok(Vec::new())
        }

        async fn count_by_user(&self, _user_id: &str) -> Result<u64, RepoError> {
            Ok(0)
        }

        async fn increment_counter(&self, _id: Uuid, _counter: PostCounter) -> Result<i64, RepoError> {
            Err(RepoError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_missing_parent_is_reported() {
        let updater = CounterUpdater::new(Arc::new(NoPosts));
        let post_id = Uuid::new_v4();

        let err = updater
            .increment(post_id, PostCounter::Comments)
            .await
            .unwrap_err();

        assert!(matches!(err, CounterError::ParentNotFound(id) if id == post_id));
    }
}
