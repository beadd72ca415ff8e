use foodgram_auth_types::token::{issue_token, validate_token};
use foodgram_domain::id::UserId;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::User;
use crate::error::{ApiError, FieldErrors};
use crate::usecase::fields::REQUIRED;

// ── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub auth_token: String,
    pub expires_at: u64,
}

pub struct LoginUseCase<U: UserRepository, P: PasswordHasher> {
    pub users: U,
    pub passwords: P,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl<U: UserRepository, P: PasswordHasher> LoginUseCase<U, P> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let mut errors = FieldErrors::new();
        let email = input.email.filter(|e| !e.trim().is_empty());
        let password = input.password.filter(|p| !p.is_empty());
        if email.is_none() {
            errors.add("email", REQUIRED);
        }
        if password.is_none() {
            errors.add("password", REQUIRED);
        }
        let (Some(email), Some(password)) = (email, password) else {
            return Err(ApiError::Validation(errors));
        };

        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            // Unknown emails cost one hash, like a wrong password.
            let _ = self.passwords.hash(&password).await;
            return Err(ApiError::InvalidCredentials);
        };
        if !self.passwords.verify(&password, &user.password_hash).await? {
            return Err(ApiError::InvalidCredentials);
        }

        let (auth_token, expires_at) = issue_token(
            user.id.0,
            user.token_version,
            self.token_ttl_secs,
            &self.jwt_secret,
        )
        .map_err(|e| anyhow::Error::new(e).context("issue auth token"))?;
        tracing::info!(user_id = %user.id, "token issued");
        Ok(LoginOutput {
            auth_token,
            expires_at,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> LogoutUseCase<U> {
    /// Revokes every token of the user, not only the one presented.
    pub async fn execute(&self, user: &User) -> Result<(), ApiError> {
        self.users.bump_token_version(user.id).await?;
        tracing::info!(user_id = %user.id, "tokens revoked");
        Ok(())
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve a bearer token to its user.
///
/// Fails with `Unauthorized` when the token is invalid or expired, the user
/// is gone, or the token predates the user's last logout or password change.
pub async fn authenticate<U: UserRepository>(
    users: &U,
    token: &str,
    jwt_secret: &str,
) -> Result<User, ApiError> {
    let info = validate_token(token, jwt_secret).map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        ApiError::Unauthorized
    })?;
    let user = users
        .find_by_id(UserId(info.user_id))
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if user.token_version != info.version {
        return Err(ApiError::Unauthorized);
    }
    Ok(user)
}
