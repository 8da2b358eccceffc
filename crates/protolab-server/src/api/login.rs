use crate::api::{ApiError, AppState};
use crate::auth::{password, tokens};
use crate::config::ServerConfig;
use axum::{Json, extract::Extension};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
}

pub async fn access_token(
    Extension(core): Extension<AppState>,
    Extension(config): Extension<Arc<ServerConfig>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Token>, ApiError> {
    let user = core
        .storage
        .users
        .get_by_email(&req.email)
        .map_err(ApiError::from)?
        // Same rejection whether the email or the password is wrong
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    if !password::verify_password(&req.password, &user.hashed_password) {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }
    if !user.is_active {
        return Err(ApiError::unauthorized("Inactive user"));
    }

    let access_token = tokens::issue_token(user.id, &config.jwt_secret, config.token_ttl_hours)
        .map_err(ApiError::from)?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer",
    }))
}
