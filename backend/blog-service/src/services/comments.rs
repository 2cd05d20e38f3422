/// Comment service - handles comment creation, retrieval, and management
use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::middleware::check_author;
use crate::models::{AuthUser, Comment, CommentChanges, NewComment};
use crate::services::visibility::{CommentFilter, PostVisibility};
use std::sync::Arc;
use validator::Validate;

pub struct CommentService {
    store: Arc<dyn ContentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// List approved comments matching `filter`
    pub async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        self.store.list_comments(filter).await
    }

    /// Get a comment by ID; unapproved comments are reported as not found
    pub async fn get_comment(&self, comment_id: i64, filter: CommentFilter) -> Result<Comment> {
        self.store
            .find_comment(comment_id, filter)
            .await?
            .ok_or_else(|| not_found(comment_id))
    }

    /// Create a new comment authored by `author` on an existing post
    pub async fn create_comment(&self, author: &AuthUser, comment: NewComment) -> Result<Comment> {
        comment.validate()?;

        if self
            .store
            .find_post(comment.post_id, PostVisibility::for_actor(Some(author)))
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "Invalid post id {}",
                comment.post_id
            )));
        }

        let created = self.store.create_comment(author.id, &comment).await?;
        tracing::info!(
            comment_id = created.id,
            post_id = created.post_id,
            author_id = author.id,
            "comment created"
        );

        Ok(created)
    }

    /// Update a comment owned by `actor`
    pub async fn update_comment(
        &self,
        comment_id: i64,
        filter: CommentFilter,
        actor: &AuthUser,
        changes: CommentChanges,
    ) -> Result<Comment> {
        let existing = self.get_comment(comment_id, filter).await?;
        check_author(actor, &existing).map_err(|e| {
            tracing::info!(comment_id, actor_id = actor.id, "comment update denied");
            e
        })?;
        changes.validate()?;

        let updated = self
            .store
            .update_comment(comment_id, &changes)
            .await?
            .ok_or_else(|| not_found(comment_id))?;
        tracing::info!(comment_id, actor_id = actor.id, "comment updated");

        Ok(updated)
    }

    /// Delete a comment owned by `actor`
    pub async fn delete_comment(
        &self,
        comment_id: i64,
        filter: CommentFilter,
        actor: &AuthUser,
    ) -> Result<()> {
        let existing = self.get_comment(comment_id, filter).await?;
        check_author(actor, &existing).map_err(|e| {
            tracing::info!(comment_id, actor_id = actor.id, "comment delete denied");
            e
        })?;

        if !self.store.delete_comment(comment_id).await? {
            return Err(not_found(comment_id));
        }
        tracing::info!(comment_id, actor_id = actor.id, "comment deleted");

        Ok(())
    }
}

fn not_found(comment_id: i64) -> AppError {
    AppError::NotFound(format!("Comment {} not found", comment_id))
}
