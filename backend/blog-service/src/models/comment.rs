use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// Comment row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub is_approved: bool,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct NewComment {
    pub post_id: i64,
    #[validate(length(min = 1))]
    pub body: String,
    pub is_approved: bool,
}

/// The post reference is fixed at creation and has no counterpart here.
#[derive(Debug, Clone, Default, Validate)]
pub struct CommentChanges {
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub is_approved: Option<bool>,
}

impl CommentChanges {
    pub fn apply_to(&self, comment: &mut Comment) {
        if let Some(body) = &self.body {
            comment.body = body.clone();
        }
        if let Some(is_approved) = self.is_approved {
            comment.is_approved = is_approved;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    /// Author's username
    pub author: String,
    pub post: i64,
    pub body: String,
    pub is_approved: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author_username.clone(),
            post: comment.post_id,
            body: comment.body.clone(),
            is_approved: comment.is_approved,
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.to_rfc3339(),
        }
    }
}
