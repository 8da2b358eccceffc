//! Collaborator grant storage.
//!
//! The relation is keyed by the (prototype_id, user_id) pair itself, so
//! uniqueness is enforced by the database and the existence check plus
//! insert in [`CollaboratorStorage::insert_new`] happen inside a single
//! write transaction.

use crate::models::{CollaboratorGrant, Role};
use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const COLLABORATOR_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("prototype_collaborator");

#[derive(Debug, Clone)]
pub struct CollaboratorStorage {
    db: Arc<Database>,
}

impl CollaboratorStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(COLLABORATOR_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a grant only if the pair has none yet.
    ///
    /// Returns `false` without writing when a grant already exists.
    pub fn insert_new(&self, grant: &CollaboratorGrant) -> Result<bool> {
        let pid = grant.prototype_id.to_string();
        let uid = grant.user_id.to_string();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLABORATOR_TABLE)?;
            if table.get((pid.as_str(), uid.as_str()))?.is_some() {
                return Ok(false);
            }
            let json_bytes = serde_json::to_vec(grant)?;
            table.insert((pid.as_str(), uid.as_str()), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    pub fn get(&self, prototype_id: Uuid, user_id: Uuid) -> Result<Option<CollaboratorGrant>> {
        let pid = prototype_id.to_string();
        let uid = user_id.to_string();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLABORATOR_TABLE)?;

        if let Some(value) = table.get((pid.as_str(), uid.as_str()))? {
            let grant: CollaboratorGrant = serde_json::from_slice(value.value())?;
            Ok(Some(grant))
        } else {
            Ok(None)
        }
    }

    /// Change the role of an existing grant.
    ///
    /// Returns the updated grant, or `None` if the pair has no grant.
    pub fn update_role(
        &self,
        prototype_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<CollaboratorGrant>> {
        let pid = prototype_id.to_string();
        let uid = user_id.to_string();
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(COLLABORATOR_TABLE)?;
            let Some(value) = table.get((pid.as_str(), uid.as_str()))? else {
                return Ok(None);
            };
            let mut grant: CollaboratorGrant = serde_json::from_slice(value.value())?;
            drop(value);

            grant.role = role;
            let json_bytes = serde_json::to_vec(&grant)?;
            table.insert((pid.as_str(), uid.as_str()), json_bytes.as_slice())?;
            grant
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a grant. Returns `false` if the pair has no grant.
    pub fn remove(&self, prototype_id: Uuid, user_id: Uuid) -> Result<bool> {
        let pid = prototype_id.to_string();
        let uid = user_id.to_string();
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(COLLABORATOR_TABLE)?;
            table.remove((pid.as_str(), uid.as_str()))?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    pub fn list_for_prototype(&self, prototype_id: Uuid) -> Result<Vec<CollaboratorGrant>> {
        let pid = prototype_id.to_string();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLABORATOR_TABLE)?;

        let mut grants = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            if key.value().0 == pid {
                let grant: CollaboratorGrant = serde_json::from_slice(value.value())?;
                grants.push(grant);
            }
        }

        Ok(grants)
    }

    /// Ids of prototypes shared with the given user.
    pub fn prototype_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let uid = user_id.to_string();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLABORATOR_TABLE)?;

        let mut ids = Vec::new();
        for item in table.iter()? {
            let (key, _) = item?;
            let (pid, grantee) = key.value();
            if grantee == uid {
                ids.push(Uuid::parse_str(pid)?);
            }
        }

        Ok(ids)
    }

    /// Cascade delete: drop every grant belonging to a prototype.
    pub fn remove_all_for_prototype(&self, prototype_id: Uuid) -> Result<usize> {
        let pid = prototype_id.to_string();
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(COLLABORATOR_TABLE)?;
            let mut keys = Vec::new();
            for item in table.iter()? {
                let (key, _) = item?;
                let (prototype, user) = key.value();
                if prototype == pid {
                    keys.push(user.to_string());
                }
            }

            for user in &keys {
                table.remove((pid.as_str(), user.as_str()))?;
            }
            keys.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
