//! Protolab core: the authorization model and collaborator-management
//! protocol for shared prototype records, plus the redb persistence
//! behind them.
//!
//! Transport concerns live in `protolab-server`; nothing in this crate
//! knows about HTTP.

pub mod error;
pub mod models;
pub mod policy;
pub mod registry;
pub mod services;
pub mod storage;

pub use error::{CoreError, Result};

use services::PrototypeService;
use std::sync::Arc;
use storage::Storage;

/// Core application state shared across the server.
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub prototypes: PrototypeService,
}

impl AppCore {
    pub fn new(db_path: &str) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new(db_path)?);
        let prototypes = PrototypeService::new(storage.clone());

        Ok(Self {
            storage,
            prototypes,
        })
    }
}
