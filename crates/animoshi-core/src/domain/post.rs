use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a user submission with denormalized interaction counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: String,
    pub video: String,
    pub nsfw: bool,
    /// Number of likes recorded against this post. Maintained by the counter updater.
    pub likes: i64,
    /// Number of comments recorded against this post. Maintained by the counter updater.
    pub comments: i64,
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with zeroed counters.
    ///
    /// The display name is a copy of the author identity.
    pub fn new(title: String, content: String, image: String, nsfw: bool, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            image,
            video: String::new(),
            nsfw,
            likes: 0,
            comments: 0,
            user_name: user_id.clone(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregate counters stored on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCounter {
    Likes,
    Comments,
}

impl PostCounter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCounter::Likes => "likes",
            PostCounter::Comments => "comments",
        }
    }
}

impl std::fmt::Display for PostCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
