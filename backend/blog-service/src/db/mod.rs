/// Database access layer
///
/// This module provides:
/// - `ContentStore` and `CredentialStore`, the seams the services talk to
/// - Connection pooling and embedded migrations for PostgreSQL
/// - Repository functions for posts, comments, users and tokens
/// - `PgStore` (PostgreSQL) and `MemoryStore` (in-process) backends
use crate::error::Result;
use crate::models::{
    Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, User,
};
use crate::services::visibility::{CommentFilter, PostVisibility};
use async_trait::async_trait;

pub mod comment_repo;
pub mod memory;
pub mod pool;
pub mod post_repo;
pub mod postgres;
pub mod user_repo;

pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations};
pub use postgres::PgStore;

/// Persistence for posts and comments.
///
/// Reads take the visibility filter of the request; writes address records
/// by primary key and assume the caller already checked visibility and
/// authorization.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_posts(&self, visibility: PostVisibility) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: i64, visibility: PostVisibility) -> Result<Option<Post>>;

    async fn create_post(&self, author_id: i64, post: &NewPost) -> Result<Post>;

    /// Returns `None` if the post vanished before the update ran.
    async fn update_post(&self, post_id: i64, changes: &PostChanges) -> Result<Option<Post>>;

    /// Deletes the post and its comments. Returns whether a row was removed.
    async fn delete_post(&self, post_id: i64) -> Result<bool>;

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>>;

    async fn find_comment(&self, comment_id: i64, filter: CommentFilter)
        -> Result<Option<Comment>>;

    async fn create_comment(&self, author_id: i64, comment: &NewComment) -> Result<Comment>;

    async fn update_comment(
        &self,
        comment_id: i64,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>>;

    async fn delete_comment(&self, comment_id: i64) -> Result<bool>;

    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<()>;
}

/// Persistence for user identities and their tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_token(&self, key: &str) -> Result<Option<User>>;

    /// Return the user's existing token, or bind `candidate` to the user if
    /// none exists yet. Concurrent callers converge on a single token.
    async fn get_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String>;

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
}
