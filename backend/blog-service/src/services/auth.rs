/// Auth service - token issuance and user provisioning
use crate::db::CredentialStore;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::{check_password, generate_token_key, hash_password};
use actix_web::web;
use std::sync::Arc;

const MAX_USERNAME_LEN: usize = 150;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Exchange a username/password pair for the user's token.
    ///
    /// Every failure (missing field, unknown user, inactive user, wrong
    /// password) yields the same `InvalidCredentials` error.
    pub async fn issue_token(&self, username: Option<&str>, password: Option<&str>) -> Result<String> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p.to_string()),
            _ => return Err(AppError::InvalidCredentials),
        };

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .filter(|user| user.is_active);

        // Unknown and inactive users still pay for one Argon2 verification
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = web::block(move || check_password(&password, stored_hash.as_deref()))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        let user = match (user, verified) {
            (Some(user), Ok(true)) => user,
            (Some(user), Err(e)) => {
                tracing::warn!(user_id = user.id, error = %e, "stored password hash is unusable");
                return Err(AppError::InvalidCredentials);
            }
            (_, Err(e)) => return Err(e),
            _ => {
                tracing::info!("token request rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let key = self
            .store
            .get_or_create_token(user.id, &generate_token_key())
            .await?;
        tracing::info!(user_id = user.id, "token issued");

        Ok(key)
    }

    /// Provision a user with an Argon2id password hash.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        validate_username(username)?;

        let password = password.to_string();
        let password_hash = web::block(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let user = self.store.create_user(username, &password_hash).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");

        Ok(user)
    }
}

/// Letters, digits and `@.+-_`, at most 150 characters.
fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be 1 to {} characters",
            MAX_USERNAME_LEN
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(AppError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ));
    }

    Ok(())
}
