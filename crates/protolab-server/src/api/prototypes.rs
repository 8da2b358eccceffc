use crate::api::{ApiError, AppState};
use crate::auth::CurrentUser;
use axum::{
    Json,
    extract::{Extension, Path, Query},
};
use protolab_core::models::{
    CollaboratorInfo, Prototype, PrototypeCreate, PrototypeUpdate, Role,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
pub struct PrototypeList {
    pub data: Vec<Prototype>,
    pub count: usize,
}

impl PrototypeList {
    fn paginated(all: Vec<Prototype>, query: &ListQuery) -> Self {
        let count = all.len();
        let data = all
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect();
        Self { data, count }
    }
}

// GET /api/prototypes
pub async fn list(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PrototypeList>, ApiError> {
    let prototypes = core.prototypes.list_for_user(user_id)?;
    Ok(Json(PrototypeList::paginated(prototypes, &query)))
}

// POST /api/prototypes
pub async fn create(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(input): Json<PrototypeCreate>,
) -> Result<Json<Prototype>, ApiError> {
    let prototype = core.prototypes.create(user_id, input)?;
    Ok(Json(prototype))
}

// GET /api/prototypes/{id}
pub async fn get(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prototype>, ApiError> {
    let prototype = core.prototypes.get(user_id, id)?;
    Ok(Json(prototype))
}

// PUT /api/prototypes/{id}
pub async fn update(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<PrototypeUpdate>,
) -> Result<Json<Prototype>, ApiError> {
    let prototype = core.prototypes.update(user_id, id, input)?;
    Ok(Json(prototype))
}

// DELETE /api/prototypes/{id}
pub async fn delete(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    core.prototypes.delete(user_id, id)?;
    Ok(Json(serde_json::json!({ "deleted": true, "id": id })))
}

// GET /api/prototypes/public — no authentication required
pub async fn list_public(
    Extension(core): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PrototypeList>, ApiError> {
    let prototypes = core.prototypes.list_public()?;
    Ok(Json(PrototypeList::paginated(prototypes, &query)))
}

// GET /api/prototypes/public/{id} — no authentication required; serves
// only PUBLIC prototypes and 404s everything else
pub async fn get_public(
    Extension(core): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prototype>, ApiError> {
    let prototype = core.prototypes.get_public(id)?;
    Ok(Json(prototype))
}

#[derive(Debug, Serialize)]
pub struct CollaboratorList {
    pub data: Vec<CollaboratorInfo>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorAdd {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorUpdate {
    pub role: Role,
}

// GET /api/prototypes/{id}/collaborators
pub async fn list_collaborators(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollaboratorList>, ApiError> {
    let data = core.prototypes.collaborators(user_id, id)?;
    let count = data.len();
    Ok(Json(CollaboratorList { data, count }))
}

// POST /api/prototypes/{id}/collaborators
pub async fn add_collaborator(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<CollaboratorAdd>,
) -> Result<Json<CollaboratorInfo>, ApiError> {
    let info = core
        .prototypes
        .add_collaborator(user_id, id, &input.email, input.role)?;
    Ok(Json(info))
}

// PUT /api/prototypes/{id}/collaborators/{user_id}
pub async fn update_collaborator(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path((id, grantee_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CollaboratorUpdate>,
) -> Result<Json<CollaboratorInfo>, ApiError> {
    let info = core
        .prototypes
        .update_collaborator(user_id, id, grantee_id, input.role)?;
    Ok(Json(info))
}

// DELETE /api/prototypes/{id}/collaborators/{user_id}
pub async fn remove_collaborator(
    Extension(core): Extension<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path((id, grantee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    core.prototypes.remove_collaborator(user_id, id, grantee_id)?;
    Ok(Json(serde_json::json!({ "removed": true, "user_id": grantee_id })))
}
