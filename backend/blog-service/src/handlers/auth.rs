/// Token issuance endpoint
use crate::error::Result;
use crate::services::AuthService;
use crate::state::AppState;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

/// Both fields are optional so that a missing field is reported as bad
/// credentials rather than as a malformed request.
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

impl TokenRequest {
    /// Parse a JSON or form-encoded body. Anything unparseable yields an
    /// empty request.
    pub fn from_body(req: &HttpRequest, body: &[u8]) -> Self {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            std::str::from_utf8(body)
                .ok()
                .and_then(|s| web::Query::<TokenRequest>::from_query(s).ok())
                .map(web::Query::into_inner)
                .unwrap_or_default()
        } else {
            serde_json::from_slice(body).unwrap_or_default()
        }
    }
}

/// Exchange username/password for a bearer token
pub async fn obtain_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let credentials = TokenRequest::from_body(&req, &body);

    let token = AuthService::new(state.credentials.clone())
        .issue_token(credentials.username.as_deref(), credentials.password.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
