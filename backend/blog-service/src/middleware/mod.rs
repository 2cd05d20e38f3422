/// HTTP middleware utilities for blog-service
///
/// Provides token authentication and the authorization policy. The auth
/// middleware resolves the `Authorization` header once per request and
/// leaves the outcome in request extensions; handlers pick it up through
/// the `AuthUser` (required) or `Actor` (optional) extractors.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::models::AuthUser;
use crate::state::AppState;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

// =====================================================================
// Token Authentication
// =====================================================================

/// Extract the key from `Token <key>` or `Bearer <key>`.
pub fn parse_authorization(value: &str) -> Result<&str, AppError> {
    let (scheme, key) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::Unauthenticated("Invalid token header. No credentials provided.".into()))?;

    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthenticated(
            "Invalid Authorization scheme".into(),
        ));
    }

    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(AppError::Unauthenticated(
            "Invalid token header. Token string should not contain spaces.".into(),
        ));
    }

    Ok(key)
}

/// Actix middleware that resolves a token through the credential store.
///
/// Requests without an `Authorization` header pass through anonymously. A
/// header that is present but does not resolve to an active user fails the
/// request with 401, whatever the route.
pub struct TokenAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TokenAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct TokenAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let auth_header = match req.headers().get(header::AUTHORIZATION) {
                None => return service.call(req).await,
                Some(value) => value
                    .to_str()
                    .map_err(|_| AppError::Unauthenticated("Invalid Authorization header".into()))?
                    .to_string(),
            };

            let key = parse_authorization(&auth_header)?;

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("AppState not registered".into()))?;

            let user = state
                .credentials
                .find_user_by_token(key)
                .await?
                .ok_or_else(|| AppError::Unauthenticated("Invalid token".into()))?;

            if !user.is_active {
                tracing::info!(user_id = user.id, "rejected token of inactive user");
                return Err(AppError::Unauthenticated("User inactive or deleted".into()).into());
            }

            tracing::debug!(user_id = user.id, "request authenticated");
            req.extensions_mut().insert(AuthUser::from(&user));

            service.call(req).await
        })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::Unauthenticated("Authentication credentials were not provided".into())
        }))
    }
}

/// The requesting identity, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct Actor(pub Option<AuthUser>);

impl Actor {
    pub fn user(&self) -> Option<&AuthUser> {
        self.0.as_ref()
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Actor(req.extensions().get::<AuthUser>().cloned())))
    }
}
