//! Data Transfer Objects - request/response types for the API.
//!
//! Field names follow the camelCase wire format the frontend already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /comment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    pub recaptcha_token: String,
}

/// Body of `POST /likePost`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LikePostRequest {
    pub post_id: String,
    /// Ignored by the server; likes are stored as anonymous.
    pub user_id: String,
    /// Anti-abuse session token issued to the browser.
    pub ani_token: Option<String>,
    pub recaptcha_token: String,
}

/// A recorded like. Leaves out the submitting IP and session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `?id=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// `?limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// `?userId=&limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageQuery {
    pub user_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// `?userId=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// `?postId=&limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentsQuery {
    pub post_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Plain status body, e.g. `{"message":"OK"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_request_reads_frontend_field_names() {
        let req: LikePostRequest = serde_json::from_str(
            r#"{"postId":"p","userId":"u","aniToken":"s","recaptchaToken":"r"}"#,
        )
        .unwrap();

        assert_eq!(req.post_id, "p");
        assert_eq!(req.ani_token.as_deref(), Some("s"));
        assert_eq!(req.recaptcha_token, "r");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: CreateCommentRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();

        assert_eq!(req.text, "hi");
        assert!(req.recaptcha_token.is_empty());
    }
}
