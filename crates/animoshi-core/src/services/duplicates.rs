use std::sync::Arc;

use uuid::Uuid;

use crate::domain::LikeIdentity;
use crate::error::RepoError;
use crate::ports::LikeRepository;

/// Detects repeat one-shot actions (likes) by IP or session token.
///
/// This is an early rejection only. The check and the following insert are not
/// atomic; the storage-level uniqueness constraint on likes closes the race.
pub struct DuplicateDetector {
    likes: Arc<dyn LikeRepository>,
}

impl DuplicateDetector {
    pub fn new(likes: Arc<dyn LikeRepository>) -> Self {
        Self { likes }
    }

    pub async fn has_prior_like(
        &self,
        post_id: Uuid,
        identity: &LikeIdentity,
    ) -> Result<bool, RepoError> {
        self.likes.exists_for_identity(post_id, identity).await
    }
}
