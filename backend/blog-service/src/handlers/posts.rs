/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::Actor;
use crate::models::{AuthUser, NewPost, PostChanges, PostResponse};
use crate::services::PostService;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Request body for creating a post. Any `author` key is ignored.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub is_published: bool,
}

/// Request body for PUT: title and body are required.
#[derive(Debug, Deserialize)]
pub struct ReplacePostRequest {
    pub title: String,
    pub body: String,
    #[serde(default, deserialize_with = "super::non_null")]
    pub is_published: Option<bool>,
}

/// Request body for PATCH: every field optional, none nullable.
#[derive(Debug, Default, Deserialize)]
pub struct PatchPostRequest {
    #[serde(default, deserialize_with = "super::non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub is_published: Option<bool>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            body: req.body.trim().to_string(),
            is_published: req.is_published,
        }
    }
}

impl From<ReplacePostRequest> for PostChanges {
    fn from(req: ReplacePostRequest) -> Self {
        Self {
            title: Some(req.title.trim().to_string()),
            body: Some(req.body.trim().to_string()),
            is_published: req.is_published,
        }
    }
}

impl From<PatchPostRequest> for PostChanges {
    fn from(req: PatchPostRequest) -> Self {
        Self {
            title: req.title.map(|t| t.trim().to_string()),
            body: req.body.map(|b| b.trim().to_string()),
            is_published: req.is_published,
        }
    }
}

fn service(state: &AppState) -> PostService {
    PostService::new(state.content.clone())
}

/// List posts visible to the requester
pub async fn list_posts(state: web::Data<AppState>, actor: Actor) -> Result<HttpResponse> {
    let posts = service(&state).list_posts(actor.user()).await?;
    let body: Vec<PostResponse> = posts.iter().map(PostResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Get a post by ID
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    actor: Actor,
) -> Result<HttpResponse> {
    let post = service(&state).get_post(*post_id, actor.user()).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(&post)))
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .create_post(&user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(PostResponse::from(&post)))
}

/// Replace a post (PUT)
pub async fn replace_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    user: AuthUser,
    req: web::Json<ReplacePostRequest>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .update_post(*post_id, &user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(&post)))
}

/// Partially update a post (PATCH)
pub async fn patch_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    user: AuthUser,
    req: web::Json<PatchPostRequest>,
) -> Result<HttpResponse> {
    let post = service(&state)
        .update_post(*post_id, &user, req.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(&post)))
}

/// Delete a post
pub async fn delete_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    user: AuthUser,
) -> Result<HttpResponse> {
    service(&state).delete_post(*post_id, &user).await?;

    Ok(HttpResponse::NoContent().finish())
}
