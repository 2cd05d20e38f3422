/// Data models for blog-service
///
/// This module defines structures for:
/// - User: identities held by the credential store
/// - Post: authored articles with a publication flag
/// - Comment: authored remarks on a post with an approval flag
///
/// Store records (`Post`, `Comment`) are kept apart from their wire
/// representations (`PostResponse`, `CommentResponse`) so that only
/// allow-listed fields ever leave the service.
pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentChanges, CommentResponse, NewComment};
pub use post::{NewPost, Post, PostChanges, PostResponse};
pub use user::{AuthUser, User};
