use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use animoshi_core::domain::{Comment, Like, LikeIdentity, Post, PostCounter, Waifu};
use animoshi_core::error::RepoError;
use animoshi_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, WaifuRepository,
};
use animoshi_core::validation::Page;

#[derive(Default)]
struct Collections {
    posts: HashMap<Uuid, Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    waifus: HashMap<Uuid, Waifu>,
}

/// All four collections behind one async RwLock.
///
/// Counter increments and the like uniqueness rule run under the write lock,
/// so they behave like the atomic operations of the PostgreSQL store.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    data: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Collections::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first, then the offset/limit window.
fn page_of<T: Clone>(
    items: impl Iterator<Item = T>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
    page: Page,
) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| Reverse(created_at(item)));
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.data.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut data = self.data.write().await;
        if data.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        data.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list_recent(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;
        Ok(page_of(data.posts.values().cloned(), |p| p.created_at, page))
    }

    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;
        let posts = data
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned();
        Ok(page_of(posts, |p| p.created_at, page))
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, RepoError> {
        let data = self.data.read().await;
        Ok(data.posts.values().filter(|p| p.user_id == user_id).count() as u64)
    }

    async fn increment_counter(&self, id: Uuid, counter: PostCounter) -> Result<i64, RepoError> {
        let mut data = self.data.write().await;
        let post = data.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        let value = match counter {
            PostCounter::Likes => &mut post.likes,
            PostCounter::Comments => &mut post.comments,
        };
        *value += 1;
        let value = *value;
        post.updated_at = Utc::now();

        Ok(value)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let data = self.data.read().await;
        Ok(data.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.data.write().await.comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_by_post(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>, RepoError> {
        let data = self.data.read().await;
        let comments = data
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned();
        Ok(page_of(comments, |c| c.created_at, page))
    }
}

#[async_trait]
impl BaseRepository<Like, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Like>, RepoError> {
        let data = self.data.read().await;
        Ok(data.likes.iter().find(|l| l.id == id).cloned())
    }

    /// Enforces the same uniqueness as the `likes` table indexes.
    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut data = self.data.write().await;

        let identity = LikeIdentity::from(&like);
        if data
            .likes
            .iter()
            .any(|existing| existing.post_id == like.post_id && identity.matches(existing))
        {
            return Err(RepoError::Constraint(
                "likes already contain this post and identity".to_string(),
            ));
        }

        data.likes.push(like.clone());
        Ok(like)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists_for_identity(
        &self,
        post_id: Uuid,
        identity: &LikeIdentity,
    ) -> Result<bool, RepoError> {
        let data = self.data.read().await;
        Ok(data
            .likes
            .iter()
            .any(|like| like.post_id == post_id && identity.matches(like)))
    }
}

#[async_trait]
impl BaseRepository<Waifu, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Waifu>, RepoError> {
        Ok(self.data.read().await.waifus.get(&id).cloned())
    }

    async fn insert(&self, waifu: Waifu) -> Result<Waifu, RepoError> {
        self.data.write().await.waifus.insert(waifu.id, waifu.clone());
        Ok(waifu)
    }
}

#[async_trait]
impl WaifuRepository for InMemoryStore {
    async fn list_approved(&self, page: Page) -> Result<Vec<Waifu>, RepoError> {
        let data = self.data.read().await;
        let waifus = data
            .waifus
            .values()
            .filter(|w| w.status.is_visible())
            .cloned();
        Ok(page_of(waifus, |w| w.created_at, page))
    }
}
