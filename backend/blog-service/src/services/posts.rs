/// Post service - handles post creation, retrieval, and management
use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::middleware::check_author;
use crate::models::{AuthUser, NewPost, Post, PostChanges};
use crate::services::visibility::PostVisibility;
use std::sync::Arc;
use validator::Validate;

pub struct PostService {
    store: Arc<dyn ContentStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// List the posts visible to `actor`
    pub async fn list_posts(&self, actor: Option<&AuthUser>) -> Result<Vec<Post>> {
        self.store.list_posts(PostVisibility::for_actor(actor)).await
    }

    /// Get a post by ID; hidden posts are reported as not found
    pub async fn get_post(&self, post_id: i64, actor: Option<&AuthUser>) -> Result<Post> {
        self.store
            .find_post(post_id, PostVisibility::for_actor(actor))
            .await?
            .ok_or_else(|| not_found(post_id))
    }

    /// Create a new post authored by `author`
    pub async fn create_post(&self, author: &AuthUser, post: NewPost) -> Result<Post> {
        post.validate()?;

        let created = self.store.create_post(author.id, &post).await?;
        tracing::info!(post_id = created.id, author_id = author.id, "post created");

        Ok(created)
    }

    /// Update a post owned by `actor`
    pub async fn update_post(
        &self,
        post_id: i64,
        actor: &AuthUser,
        changes: PostChanges,
    ) -> Result<Post> {
        let existing = self.get_post(post_id, Some(actor)).await?;
        check_author(actor, &existing).map_err(|e| {
            tracing::info!(post_id, actor_id = actor.id, "post update denied");
            e
        })?;
        changes.validate()?;

        let updated = self
            .store
            .update_post(post_id, &changes)
            .await?
            .ok_or_else(|| not_found(post_id))?;
        tracing::info!(post_id, actor_id = actor.id, "post updated");

        Ok(updated)
    }

    /// Delete a post owned by `actor`
    pub async fn delete_post(&self, post_id: i64, actor: &AuthUser) -> Result<()> {
        let existing = self.get_post(post_id, Some(actor)).await?;
        check_author(actor, &existing).map_err(|e| {
            tracing::info!(post_id, actor_id = actor.id, "post delete denied");
            e
        })?;

        if !self.store.delete_post(post_id).await? {
            return Err(not_found(post_id));
        }
        tracing::info!(post_id, actor_id = actor.id, "post deleted");

        Ok(())
    }
}

fn not_found(post_id: i64) -> AppError {
    AppError::NotFound(format!("Post {} not found", post_id))
}
