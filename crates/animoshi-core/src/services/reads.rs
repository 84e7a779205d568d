//! Side-effect-free reads. No gating; page size is bounded by `Page`.

use uuid::Uuid;

use crate::domain::{Comment, Post, Waifu};
use crate::error::InteractionError;
use crate::validation::Page;

use super::interactions::InteractionService;

impl InteractionService {
    pub async fn get_post(&self, id: Uuid) -> Result<Post, InteractionError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(InteractionError::NotFound {
                entity_type: "post",
                id,
            })
    }

    pub async fn list_posts(&self, page: Page) -> Result<Vec<Post>, InteractionError> {
        Ok(self.posts.list_recent(page).await?)
    }

    pub async fn list_posts_by_user(
        &self,
        user_id: &str,
        page: Page,
    ) -> Result<Vec<Post>, InteractionError> {
        Ok(self.posts.list_by_user(user_id, page).await?)
    }

    pub async fn count_posts_by_user(&self, user_id: &str) -> Result<u64, InteractionError> {
        Ok(self.posts.count_by_user(user_id).await?)
    }

    pub async fn list_comments(
        &self,
        post_id: Uuid,
        page: Page,
    ) -> Result<Vec<Comment>, InteractionError> {
        Ok(self.comments.list_by_post(post_id, page).await?)
    }

    /// Waifus that are not approved are reported as missing.
    pub async fn get_waifu(&self, id: Uuid) -> Result<Waifu, InteractionError> {
        self.waifus
            .find_by_id(id)
            .await?
            .filter(|waifu| waifu.status.is_visible())
            .ok_or(InteractionError::NotFound {
                entity_type: "waifu",
                id,
            })
    }

    pub async fn list_waifus(&self, page: Page) -> Result<Vec<Waifu>, InteractionError> {
        Ok(self.waifus.list_approved(page).await?)
    }
}
