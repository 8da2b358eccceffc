//! Persistence layer backed by redb.
//!
//! A simple key-value design with one table per entity type, plus an
//! email index for users and a composite-key table for collaborator
//! grants. Values are JSON-serialized models.

pub mod collaborator;
pub mod prototype;
pub mod user;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use collaborator::CollaboratorStorage;
pub use prototype::PrototypeStorage;
pub use user::UserStorage;

/// Central storage manager that initializes all storage subsystems.
pub struct Storage {
    db: Arc<Database>,
    pub users: UserStorage,
    pub prototypes: PrototypeStorage,
    pub collaborators: CollaboratorStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// Creates the database file if it doesn't exist and initializes all
    /// required tables.
    pub fn new(path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);
        Self::with_db(db)
    }

    pub fn with_db(db: Arc<Database>) -> Result<Self> {
        let users = UserStorage::new(db.clone())?;
        let prototypes = PrototypeStorage::new(db.clone())?;
        let collaborators = CollaboratorStorage::new(db.clone())?;

        Ok(Self {
            db,
            users,
            prototypes,
            collaborators,
        })
    }

    /// Get a reference to the underlying database.
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
