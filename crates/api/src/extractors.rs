//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use regportal_common::{AppError, AuthPayload};

/// Authenticated caller extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthPayload);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when a valid bearer token is present
        parts
            .extensions
            .get::<AuthPayload>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Administrator extractor.
///
/// Missing or invalid credentials are `Unauthorized`; a valid caller without
/// the admin role is `Forbidden`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthPayload);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(payload) = AuthUser::from_request_parts(parts, state).await?;

        if !payload.is_admin() {
            return Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            ));
        }

        Ok(Self(payload))
    }
}
