/// Business logic layer
///
/// Services sit between the handlers and the stores: they apply the read
/// visibility filter, run the authorization policy before every mutation,
/// and issue tokens.
pub mod auth;
pub mod comments;
pub mod posts;
pub mod visibility;

pub use auth::AuthService;
pub use comments::CommentService;
pub use posts::PostService;
pub use visibility::{CommentFilter, PostVisibility};
