use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use protolab_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", resource))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.status.as_u16(),
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::PrototypeNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::CollaboratorNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::AlreadyCollaborator(_) | CoreError::EmailTaken(_) => StatusCode::CONFLICT,
            CoreError::InvalidGrantee => StatusCode::BAD_REQUEST,
            CoreError::Forbidden => StatusCode::FORBIDDEN,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::Storage(inner) => {
                tracing::error!(error = %inner, "storage error");
                return Self::internal("Internal server error");
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "API error");
        Self::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_core_error_mapping() {
        let id = Uuid::new_v4();
        let cases = [
            (CoreError::PrototypeNotFound(id), StatusCode::NOT_FOUND),
            (CoreError::AlreadyCollaborator(id), StatusCode::CONFLICT),
            (CoreError::CollaboratorNotFound(id), StatusCode::NOT_FOUND),
            (CoreError::InvalidGrantee, StatusCode::BAD_REQUEST),
            (CoreError::Forbidden, StatusCode::FORBIDDEN),
            (
                CoreError::Validation("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }
}
