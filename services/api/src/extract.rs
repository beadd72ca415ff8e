//! Request extractors.
//!
//! Body, path and query extractors reject with [`ApiError`] so malformed
//! input gets the same JSON error body as everything else. [`AuthUser`] and
//! [`MaybeUser`] resolve the `Authorization` token to a stored user.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use foodgram_auth_types::identity::token_from_headers;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::token::authenticate;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor that accepts repeated keys (`?tags=a&tags=b`).
#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The authenticated caller. Rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The caller if a token was sent. A token that is sent but invalid is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    // Header parsing happens synchronously; only the user lookup is awaited,
    // so the returned future borrows nothing from `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = token_from_headers(&parts.headers);
        let users = state.user_repo();
        let jwt_secret = state.jwt_secret.clone();

        async move {
            let token = token.map_err(|e| {
                tracing::debug!(error = %e, "authorization header rejected");
                ApiError::Unauthorized
            })?;
            match token {
                None => Ok(Self(None)),
                Some(token) => {
                    let user = authenticate(&users, &token, &jwt_secret).await?;
                    Ok(Self(Some(user)))
                }
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let viewer = MaybeUser::from_request_parts(parts, state);
        async move {
            let MaybeUser(user) = viewer.await?;
            user.map(Self).ok_or(ApiError::Unauthorized)
        }
    }
}
