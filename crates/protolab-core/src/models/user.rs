//! User account models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A registered user account.
///
/// The password hash never leaves the backend; API responses use
/// [`UserPublic`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl User {
    pub fn new(email: String, full_name: Option<String>, hashed_password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            hashed_password,
            is_active: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// User fields safe to return via the API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
        }
    }
}
