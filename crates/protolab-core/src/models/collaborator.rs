//! Collaborator grant models.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Access level held by a non-owner collaborator.
///
/// Owner rights are implicit and never represented as a role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
}

/// One row of the (prototype, user) → role relation.
///
/// The pair is the storage key, so at most one grant can exist per pair.
/// Absence of a row means no granted access.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollaboratorGrant {
    pub prototype_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    #[ts(type = "number")]
    pub created_at: i64,
}

impl CollaboratorGrant {
    pub fn new(prototype_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            prototype_id,
            user_id,
            role,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// A grant joined with the grantee's email, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollaboratorInfo {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}
