use super::{comment_repo, post_repo, user_repo, ContentStore, CredentialStore};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, User};
use crate::services::visibility::{CommentFilter, PostVisibility};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_posts(&self, visibility: PostVisibility) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool, visibility.includes_unpublished()).await?)
    }

    async fn find_post(&self, post_id: i64, visibility: PostVisibility) -> Result<Option<Post>> {
        Ok(
            post_repo::find_post_by_id(&self.pool, post_id, visibility.includes_unpublished())
                .await?,
        )
    }

    async fn create_post(&self, author_id: i64, post: &NewPost) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, author_id, post).await?)
    }

    async fn update_post(&self, post_id: i64, changes: &PostChanges) -> Result<Option<Post>> {
        Ok(post_repo::update_post(&self.pool, post_id, changes).await?)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id).await?)
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        Ok(comment_repo::list_approved_comments(&self.pool, filter.post).await?)
    }

    async fn find_comment(
        &self,
        comment_id: i64,
        filter: CommentFilter,
    ) -> Result<Option<Comment>> {
        Ok(comment_repo::find_approved_comment(&self.pool, comment_id, filter.post).await?)
    }

    async fn create_comment(&self, author_id: i64, comment: &NewComment) -> Result<Comment> {
        comment_repo::create_comment(&self.pool, author_id, comment)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Validation(format!("Invalid post id {}", comment.post_id))
                }
                other => other.into(),
            })
    }

    async fn update_comment(
        &self,
        comment_id: i64,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>> {
        Ok(comment_repo::update_comment(&self.pool, comment_id, changes).await?)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, comment_id).await?)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(user_repo::find_user_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_token(&self, key: &str) -> Result<Option<User>> {
        Ok(user_repo::find_user_by_token(&self.pool, key).await?)
    }

    async fn get_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String> {
        Ok(user_repo::get_or_create_token(&self.pool, user_id, candidate).await?)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        user_repo::create_user(&self.pool, username, password_hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Validation(format!("Username '{}' is already taken", username))
                }
                other => other.into(),
            })
    }
}
