//! Request authentication.
//!
//! Resolves the bearer token to a trusted [`CurrentUser`] before any
//! handler runs; everything past this point works with an
//! already-authenticated identity.

use crate::api::error::ApiError;
use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use protolab_core::AppCore;
use std::sync::Arc;

use super::tokens;

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub uuid::Uuid);

// Routes served without a token: login, signup, and the public
// prototype surface.
const PUBLIC_PREFIXES: &[&str] = &[
    "/api/login",
    "/api/users/signup",
    "/api/prototypes/public",
];

pub async fn require_auth(
    mut req: Request,
    next: Next,
    core: Arc<AppCore>,
    jwt_secret: String,
) -> Response {
    let path = req.uri().path();
    if !path.starts_with("/api") || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return next.run(req).await;
    }

    let Some(token) = extract_bearer(req.headers().get(header::AUTHORIZATION)) else {
        return ApiError::unauthorized("Missing Authorization header").into_response();
    };

    let Some(user_id) = tokens::verify_token(&token, &jwt_secret) else {
        return ApiError::unauthorized("Invalid or expired token").into_response();
    };

    // The token may outlive the account
    let user = match core.storage.users.get(user_id) {
        Ok(Some(user)) => user,
        Ok(None) => return ApiError::unauthorized("Unknown user").into_response(),
        Err(err) => return ApiError::from(err).into_response(),
    };
    if !user.is_active {
        return ApiError::unauthorized("Inactive user").into_response();
    }

    req.extensions_mut().insert(CurrentUser(user.id));
    next.run(req).await
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}
