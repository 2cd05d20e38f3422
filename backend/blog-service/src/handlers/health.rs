use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.content.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "blog-service"
            }))
        }
    }
}
