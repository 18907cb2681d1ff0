//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use regportal_common::TokenManager;
use regportal_core::services::{Mailer, RegistrationService, ReviewService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub registration_service: RegistrationService,
    pub review_service: ReviewService,
    pub user_service: UserService,
    pub mailer: Mailer,
    pub tokens: TokenManager,
}

/// Authentication middleware.
///
/// Verifies a bearer token if one is present and stores the caller's
/// identity in request extensions. Requests without a valid token proceed
/// anonymously; protected extractors reject them downstream.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(payload) = state.tokens.verify(token)
    {
        req.extensions_mut().insert(payload);
    }

    next.run(req).await
}
