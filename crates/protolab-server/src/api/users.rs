use crate::api::{ApiError, AppState};
use crate::auth::{CurrentUser, password};
use axum::{Json, extract::Extension};
use protolab_core::models::{User, UserPublic};
use serde::Deserialize;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 40;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

pub async fn signup(
    Extension(core): Extension<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<UserPublic>, ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if req.password.len() < PASSWORD_MIN_LEN || req.password.len() > PASSWORD_MAX_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be between {} and {} characters",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        )));
    }

    let user = User::new(email, req.full_name, password::hash_password(&req.password));
    if !core.storage.users.create(&user).map_err(ApiError::from)? {
        return Err(ApiError::from(protolab_core::CoreError::EmailTaken(
            user.email,
        )));
    }

    tracing::info!(user = %user.id, "user registered");
    Ok(Json(UserPublic::from(&user)))
}

pub async fn me(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = core
        .storage
        .users
        .get(user_id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(UserPublic::from(&user)))
}
