use crate::models::{NewPost, Post, PostChanges};
use sqlx::PgPool;

/// List posts, newest first. Drafts are included only when asked for.
pub async fn list_posts(pool: &PgPool, include_unpublished: bool) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.title, p.body, p.is_published, p.author_id,
               u.username AS author_username, p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE ($1 OR p.is_published)
        ORDER BY p.created_at DESC, p.id DESC
        "#,
    )
    .bind(include_unpublished)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Find a post by ID under the same publication rule as `list_posts`
pub async fn find_post_by_id(
    pool: &PgPool,
    post_id: i64,
    include_unpublished: bool,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.title, p.body, p.is_published, p.author_id,
               u.username AS author_username, p.created_at, p.updated_at
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1 AND ($2 OR p.is_published)
        "#,
    )
    .bind(post_id)
    .bind(include_unpublished)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

pub async fn create_post(pool: &PgPool, author_id: i64, new: &NewPost) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (title, body, is_published, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, is_published, author_id, created_at, updated_at
        )
        SELECT i.id, i.title, i.body, i.is_published, i.author_id,
               u.username AS author_username, i.created_at, i.updated_at
        FROM inserted i
        JOIN users u ON u.id = i.author_id
        "#,
    )
    .bind(&new.title)
    .bind(&new.body)
    .bind(new.is_published)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Apply changes to a post. `author_id` is never written here.
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    changes: &PostChanges,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        WITH updated AS (
            UPDATE posts
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                is_published = COALESCE($4, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, body, is_published, author_id, created_at, updated_at
        )
        SELECT d.id, d.title, d.body, d.is_published, d.author_id,
               u.username AS author_username, d.created_at, d.updated_at
        FROM updated d
        JOIN users u ON u.id = d.author_id
        "#,
    )
    .bind(post_id)
    .bind(changes.title.as_deref())
    .bind(changes.body.as_deref())
    .bind(changes.is_published)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Delete a post; its comments go with it (ON DELETE CASCADE)
pub async fn delete_post(pool: &PgPool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
