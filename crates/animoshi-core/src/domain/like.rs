use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Author identity stored on every like.
///
/// Likes are anonymous: whatever identity the caller supplies is replaced by this value.
pub const ANONYMOUS_USER: &str = "Anonymous";

/// Like entity - a one-shot action per (post, IP) and per (post, session token).
///
/// Not serializable on purpose: responses go through a narrower DTO that
/// leaves out the submitting IP and the session token.
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub user_ip: String,
    pub session_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Like {
    /// Create a new anonymous like.
    pub fn new(post_id: Uuid, user_ip: String, session_token: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id: ANONYMOUS_USER.to_string(),
            user_ip,
            session_token,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The signals used to recognise a repeat like: submitting IP and optional session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeIdentity {
    pub ip: String,
    pub session_token: Option<String>,
}

impl LikeIdentity {
    /// True when either signal matches the stored like.
    pub fn matches(&self, like: &Like) -> bool {
        like.user_ip == self.ip
            || matches!(
                (&self.session_token, &like.session_token),
                (Some(mine), Some(theirs)) if mine == theirs
            )
    }
}

impl From<&Like> for LikeIdentity {
    fn from(like: &Like) -> Self {
        Self {
            ip: like.user_ip.clone(),
            session_token: like.session_token.clone(),
        }
    }
}
