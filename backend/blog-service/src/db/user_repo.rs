use crate::models::User;
use sqlx::PgPool;

pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, is_active, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_token(pool: &PgPool, key: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.password_hash, u.is_active, u.created_at
        FROM auth_tokens t
        JOIN users u ON u.id = t.user_id
        WHERE t.key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        RETURNING id, username, password_hash, is_active, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Bind `candidate` to the user unless a token already exists, then return
/// whichever token is bound.
pub async fn get_or_create_token(
    pool: &PgPool,
    user_id: i64,
    candidate: &str,
) -> Result<String, sqlx::Error> {
    let inserted: Option<(String,)> = sqlx::query_as(
        r#"
        INSERT INTO auth_tokens (key, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING key
        "#,
    )
    .bind(candidate)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if let Some((key,)) = inserted {
        return Ok(key);
    }

    let (key,): (String,) = sqlx::query_as("SELECT key FROM auth_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(key)
}
