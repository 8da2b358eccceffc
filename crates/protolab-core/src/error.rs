//! Error types for the core.

use thiserror::Error;
use uuid::Uuid;

/// Typed failures surfaced by the registry and services.
///
/// None of these are transient; nothing retries them. The transport layer
/// maps each kind to a status code.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Prototype {0} not found")]
    PrototypeNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Email {0} is already registered")]
    EmailTaken(String),

    #[error("User {0} is already a collaborator")]
    AlreadyCollaborator(Uuid),

    #[error("Collaborator {0} not found")]
    CollaboratorNotFound(Uuid),

    #[error("The owner cannot be added as a collaborator")]
    InvalidGrantee,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
