use crate::models::{Comment, CommentChanges, NewComment};
use sqlx::PgPool;

/// Get approved comments, optionally restricted to one post
pub async fn list_approved_comments(
    pool: &PgPool,
    post_id: Option<i64>,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.post_id, c.body, c.is_approved, c.author_id,
               u.username AS author_username, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.is_approved
          AND ($1::BIGINT IS NULL OR c.post_id = $1)
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Get a single approved comment by ID
pub async fn find_approved_comment(
    pool: &PgPool,
    comment_id: i64,
    post_id: Option<i64>,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.post_id, c.body, c.is_approved, c.author_id,
               u.username AS author_username, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1
          AND c.is_approved
          AND ($2::BIGINT IS NULL OR c.post_id = $2)
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    author_id: i64,
    new: &NewComment,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (post_id, body, is_approved, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, body, is_approved, author_id, created_at, updated_at
        )
        SELECT i.id, i.post_id, i.body, i.is_approved, i.author_id,
               u.username AS author_username, i.created_at, i.updated_at
        FROM inserted i
        JOIN users u ON u.id = i.author_id
        "#,
    )
    .bind(new.post_id)
    .bind(&new.body)
    .bind(new.is_approved)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Update comment content and approval. `post_id` and `author_id` stay fixed.
pub async fn update_comment(
    pool: &PgPool,
    comment_id: i64,
    changes: &CommentChanges,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        WITH updated AS (
            UPDATE comments
            SET body = COALESCE($2, body),
                is_approved = COALESCE($3, is_approved),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, body, is_approved, author_id, created_at, updated_at
        )
        SELECT d.id, d.post_id, d.body, d.is_approved, d.author_id,
               u.username AS author_username, d.created_at, d.updated_at
        FROM updated d
        JOIN users u ON u.id = d.author_id
        "#,
    )
    .bind(comment_id)
    .bind(changes.body.as_deref())
    .bind(changes.is_approved)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

pub async fn delete_comment(pool: &PgPool, comment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
