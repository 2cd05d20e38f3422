/// Authorization policy for blog-service
///
/// Ownership-based permission checks shared by posts and comments: only a
/// resource's author may update or delete it.
use crate::error::{AppError, Result};
use crate::models::{AuthUser, Comment, Post};

pub const INSUFFICIENT_PRIVILEGES: &str = "insufficient privileges";

/// Anything with an immutable author.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }
}

/// Decide whether `actor` may mutate `resource`. Pure; the resource must
/// already have been fetched.
pub fn authorize_mutation<R: Authored + ?Sized>(actor: Option<&AuthUser>, resource: &R) -> Decision {
    match actor {
        Some(actor) if actor.id == resource.author_id() => Decision::Allow,
        _ => Decision::Deny(INSUFFICIENT_PRIVILEGES),
    }
}

/// `authorize_mutation` mapped onto `AppError::Forbidden`.
pub fn check_author<R: Authored + ?Sized>(actor: &AuthUser, resource: &R) -> Result<()> {
    authorize_mutation(Some(actor), resource).into_result()
}
