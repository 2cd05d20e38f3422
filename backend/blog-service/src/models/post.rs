use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// Post row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted on create. The author is supplied separately by the
/// caller from the authenticated identity.
#[derive(Debug, Clone, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    pub is_published: bool,
}

/// Field changes for an update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostChanges {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub is_published: Option<bool>,
}

impl PostChanges {
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(body) = &self.body {
            post.body = body.clone();
        }
        if let Some(is_published) = self.is_published {
            post.is_published = is_published;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: i64,
    /// Author's username
    pub author: String,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author: post.author_username.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
            is_published: post.is_published,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}
