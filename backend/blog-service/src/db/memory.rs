use super::{ContentStore, CredentialStore};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentChanges, NewComment, NewPost, Post, PostChanges, User};
use crate::services::visibility::{CommentFilter, PostVisibility};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    /// token key -> user id
    tokens: HashMap<String, i64>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    next_user_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl Inner {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn username(&self, user_id: i64) -> Result<String> {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| AppError::Internal(format!("Unknown user id {}", user_id)))
    }
}

/// In-memory store for development and tests.
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_posts(&self, visibility: PostVisibility) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let posts = inner
            .posts
            .values()
            .filter(|p| visibility.admits(p))
            .cloned()
            .collect();
        Ok(newest_first(posts, |p| (p.created_at, p.id)))
    }

    async fn find_post(&self, post_id: i64, visibility: PostVisibility) -> Result<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .get(&post_id)
            .filter(|p| visibility.admits(p))
            .cloned())
    }

    async fn create_post(&self, author_id: i64, post: &NewPost) -> Result<Post> {
        let mut inner = self.inner.write().await;
        let author_username = inner.username(author_id)?;
        let id = Inner::next_id(&mut inner.next_post_id);
        let now = Utc::now();
        let record = Post {
            id,
            title: post.title.clone(),
            body: post.body.clone(),
            is_published: post.is_published,
            author_id,
            author_username,
            created_at: now,
            updated_at: now,
        };
        inner.posts.insert(id, record.clone());
        Ok(record)
    }

    async fn update_post(&self, post_id: i64, changes: &PostChanges) -> Result<Option<Post>> {
        let mut inner = self.inner.write().await;
        Ok(inner.posts.get_mut(&post_id).map(|post| {
            changes.apply_to(post);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.posts.remove(&post_id).is_some();
        if removed {
            inner.comments.retain(|_, c| c.post_id != post_id);
        }
        Ok(removed)
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        let inner = self.inner.read().await;
        let comments = inner
            .comments
            .values()
            .filter(|c| filter.admits(c))
            .cloned()
            .collect();
        Ok(newest_first(comments, |c| (c.created_at, c.id)))
    }

    async fn find_comment(
        &self,
        comment_id: i64,
        filter: CommentFilter,
    ) -> Result<Option<Comment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .get(&comment_id)
            .filter(|c| filter.admits(c))
            .cloned())
    }

    async fn create_comment(&self, author_id: i64, comment: &NewComment) -> Result<Comment> {
        let mut inner = self.inner.write().await;
        if !inner.posts.contains_key(&comment.post_id) {
            return Err(AppError::Validation(format!(
                "Invalid post id {}",
                comment.post_id
            )));
        }
        let author_username = inner.username(author_id)?;
        let id = Inner::next_id(&mut inner.next_comment_id);
        let now = Utc::now();
        let record = Comment {
            id,
            post_id: comment.post_id,
            body: comment.body.clone(),
            is_approved: comment.is_approved,
            author_id,
            author_username,
            created_at: now,
            updated_at: now,
        };
        inner.comments.insert(id, record.clone());
        Ok(record)
    }

    async fn update_comment(
        &self,
        comment_id: i64,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>> {
        let mut inner = self.inner.write().await;
        Ok(inner.comments.get_mut(&comment_id).map(|comment| {
            changes.apply_to(comment);
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.comments.remove(&comment_id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_token(&self, key: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tokens
            .get(key)
            .and_then(|user_id| inner.users.get(user_id))
            .cloned())
    }

    async fn get_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String> {
        let mut inner = self.inner.write().await;
        if let Some((key, _)) = inner.tokens.iter().find(|(_, id)| **id == user_id) {
            return Ok(key.clone());
        }
        inner.tokens.insert(candidate.to_string(), user_id);
        Ok(candidate.to_string())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == username) {
            return Err(AppError::Validation(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        let id = Inner::next_id(&mut inner.next_user_id);
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }
}

impl MemoryStore {
    /// Flip a user's active flag. Only the in-memory backend exposes this;
    /// PostgreSQL users are deactivated directly in the database.
    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;
        user.is_active = is_active;
        Ok(())
    }
}
