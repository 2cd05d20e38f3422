/// Route table
///
/// | Method                 | Path                      | Handler            |
/// |------------------------|---------------------------|--------------------|
/// | GET                    | /api/v1/health/           | `health`           |
/// | GET, POST              | /api/v1/posts/            | list / create      |
/// | GET, PUT, PATCH, DELETE| /api/v1/posts/{id}/       | retrieve / write   |
/// | GET, POST              | /api/v1/comments/         | list / create      |
/// | GET, PUT, PATCH, DELETE| /api/v1/comments/{id}/    | retrieve / write   |
/// | POST                   | /api/v1/auth/token/       | `obtain_token`     |
///
/// Paths are registered with a trailing slash; the app wraps
/// `NormalizePath` with `TrailingSlash::Always` so both spellings match.
use crate::error::AppError;
use crate::handlers;
use crate::middleware::TokenAuthMiddleware;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/api/v1/health/", web::get().to(handlers::health))
        .service(
            web::scope("/api/v1")
                .wrap(TokenAuthMiddleware)
                .service(
                    web::resource("/posts/")
                        .route(web::get().to(handlers::list_posts))
                        .route(web::post().to(handlers::create_post)),
                )
                .service(
                    web::resource("/posts/{post_id}/")
                        .route(web::get().to(handlers::get_post))
                        .route(web::put().to(handlers::replace_post))
                        .route(web::patch().to(handlers::patch_post))
                        .route(web::delete().to(handlers::delete_post)),
                )
                .service(
                    web::resource("/comments/")
                        .route(web::get().to(handlers::list_comments))
                        .route(web::post().to(handlers::create_comment)),
                )
                .service(
                    web::resource("/comments/{comment_id}/")
                        .route(web::get().to(handlers::get_comment))
                        .route(web::put().to(handlers::replace_comment))
                        .route(web::patch().to(handlers::patch_comment))
                        .route(web::delete().to(handlers::delete_comment)),
                )
                .service(
                    web::resource("/auth/token/").route(web::post().to(handlers::obtain_token)),
                ),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, req| AppError::NotFound(format!("No route for {}", req.path())).into())
}
