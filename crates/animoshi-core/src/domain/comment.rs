use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Comment entity - append-only child of a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub text: String,
    #[serde(skip_serializing)]
    pub user_ip: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: String, text: String, user_ip: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            text,
            user_ip,
            created_at: now,
            updated_at: now,
        }
    }
}
