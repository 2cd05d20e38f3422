/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Posts: list, retrieve, create, replace, patch, delete
/// - Comments: list, retrieve, create, replace, patch, delete
/// - Auth: token issuance
/// - Health: liveness and store check
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;

// Re-export handler functions at module level
pub use auth::obtain_token;
pub use comments::{
    create_comment, delete_comment, get_comment, list_comments, patch_comment, replace_comment,
};
pub use health::health;
pub use posts::{create_post, delete_post, get_post, list_posts, patch_post, replace_post};

use serde::{Deserialize, Deserializer};

/// For optional body fields: absent means "leave unchanged", an explicit
/// `null` is rejected. Pair with `#[serde(default)]`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
