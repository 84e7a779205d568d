use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation state of a waifu submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaifuStatus {
    Pending,
    Approved,
    Rejected,
}

impl WaifuStatus {
    pub fn is_visible(&self) -> bool {
        matches!(self, WaifuStatus::Approved)
    }
}

/// Waifu entity - curated, read-only through this API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waifu {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub user_id: String,
    pub rating: i64,
    pub favorites: i64,
    pub status: WaifuStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
