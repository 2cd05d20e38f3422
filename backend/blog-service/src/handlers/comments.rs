/// Comment handlers - HTTP endpoints for comment operations
use crate::error::Result;
use crate::models::{AuthUser, CommentChanges, CommentResponse, NewComment};
use crate::services::{CommentFilter, CommentService};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Query parameters shared by comment routes
#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    /// Raw post id; parsed by `CommentFilter::from_query`
    pub post: Option<String>,
}

impl CommentQuery {
    fn filter(&self) -> Result<CommentFilter> {
        CommentFilter::from_query(self.post.as_deref())
    }
}

/// Request body for creating a comment. Any `author` key is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post: i64,
    pub body: String,
    #[serde(default)]
    pub is_approved: bool,
}

/// Request body for PUT. A `post` key is ignored: comments never move.
#[derive(Debug, Deserialize)]
pub struct ReplaceCommentRequest {
    pub body: String,
    #[serde(default, deserialize_with = "super::non_null")]
    pub is_approved: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchCommentRequest {
    #[serde(default, deserialize_with = "super::non_null")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub is_approved: Option<bool>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            post_id: req.post,
            body: req.body.trim().to_string(),
            is_approved: req.is_approved,
        }
    }
}

impl From<ReplaceCommentRequest> for CommentChanges {
    fn from(req: ReplaceCommentRequest) -> Self {
        Self {
            body: Some(req.body.trim().to_string()),
            is_approved: req.is_approved,
        }
    }
}

impl From<PatchCommentRequest> for CommentChanges {
    fn from(req: PatchCommentRequest) -> Self {
        Self {
            body: req.body.map(|b| b.trim().to_string()),
            is_approved: req.is_approved,
        }
    }
}

fn service(state: &AppState) -> CommentService {
    CommentService::new(state.content.clone())
}

/// List approved comments, optionally for one post
pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<CommentQuery>,
) -> Result<HttpResponse> {
    let comments = service(&state).list_comments(query.filter()?).await?;
    let body: Vec<CommentResponse> = comments.iter().map(CommentResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Get a single approved comment
pub async fn get_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<i64>,
    query: web::Query<CommentQuery>,
) -> Result<HttpResponse> {
    let comment = service(&state)
        .get_comment(*comment_id, query.filter()?)
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(&comment)))
}

/// Create a new comment
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let comment = service(&state)
        .create_comment(&user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(&comment)))
}

/// Replace a comment (PUT)
pub async fn replace_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<i64>,
    query: web::Query<CommentQuery>,
    user: AuthUser,
    req: web::Json<ReplaceCommentRequest>,
) -> Result<HttpResponse> {
    let comment = service(&state)
        .update_comment(*comment_id, query.filter()?, &user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(&comment)))
}

/// Partially update a comment (PATCH)
pub async fn patch_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<i64>,
    query: web::Query<CommentQuery>,
    user: AuthUser,
    req: web::Json<PatchCommentRequest>,
) -> Result<HttpResponse> {
    let comment = service(&state)
        .update_comment(*comment_id, query.filter()?, &user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(&comment)))
}

/// Delete a comment
pub async fn delete_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<i64>,
    query: web::Query<CommentQuery>,
    user: AuthUser,
) -> Result<HttpResponse> {
    service(&state)
        .delete_comment(*comment_id, query.filter()?, &user)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
