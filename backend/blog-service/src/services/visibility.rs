/// Read-path visibility rules
///
/// Visibility is decided before any authorization check: a record that the
/// filter hides does not exist as far as the request is concerned, for
/// reads and writes alike.
use crate::error::{AppError, Result};
use crate::models::{AuthUser, Comment, Post};

/// Which posts a request may observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    /// Authenticated requesters see every post, drafts of other authors included.
    All,
    /// Anonymous requesters see published posts only.
    PublishedOnly,
}

impl PostVisibility {
    pub fn for_actor(actor: Option<&AuthUser>) -> Self {
        match actor {
            Some(_) => PostVisibility::All,
            None => PostVisibility::PublishedOnly,
        }
    }

    pub fn includes_unpublished(self) -> bool {
        matches!(self, PostVisibility::All)
    }

    pub fn admits(self, post: &Post) -> bool {
        self.includes_unpublished() || post.is_published
    }
}

/// Which comments a request may observe. Approval is always required,
/// whoever is asking; `post` narrows the set to one post's comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub post: Option<i64>,
}

impl CommentFilter {
    /// Build a filter from the raw `post` query value. An empty value means
    /// no filter.
    pub fn from_query(raw: Option<&str>) -> Result<Self> {
        let post = match raw.map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse::<i64>().map_err(|_| {
                AppError::BadRequest(format!("'post' must be an integer, got '{}'", value))
            })?),
        };
        Ok(Self { post })
    }

    pub fn admits(&self, comment: &Comment) -> bool {
        comment.is_approved && self.post.map_or(true, |post| comment.post_id == post)
    }
}
