//! Prototype storage.

use crate::models::{Prototype, Visibility};
use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const PROTOTYPE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("prototype");

#[derive(Debug, Clone)]
pub struct PrototypeStorage {
    db: Arc<Database>,
}

impl PrototypeStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PROTOTYPE_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn create(&self, prototype: &Prototype) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PROTOTYPE_TABLE)?;
            let json_bytes = serde_json::to_vec(prototype)?;
            table.insert(prototype.id.to_string().as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Prototype>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROTOTYPE_TABLE)?;

        if let Some(value) = table.get(id.to_string().as_str())? {
            let prototype: Prototype = serde_json::from_slice(value.value())?;
            Ok(Some(prototype))
        } else {
            Ok(None)
        }
    }

    /// Overwrite an existing prototype. Returns `false` if the id is unknown.
    pub fn update(&self, prototype: &Prototype) -> Result<bool> {
        let id = prototype.id.to_string();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PROTOTYPE_TABLE)?;
            if table.get(id.as_str())?.is_none() {
                return Ok(false);
            }
            let json_bytes = serde_json::to_vec(prototype)?;
            table.insert(id.as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Delete a prototype row. Returns `false` if the id is unknown.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(PROTOTYPE_TABLE)?;
            table.remove(id.to_string().as_str())?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    pub fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Prototype>> {
        self.scan(|p| p.owner_id == owner_id)
    }

    pub fn list_public(&self) -> Result<Vec<Prototype>> {
        self.scan(|p| p.visibility == Visibility::Public)
    }

    fn scan(&self, keep: impl Fn(&Prototype) -> bool) -> Result<Vec<Prototype>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROTOTYPE_TABLE)?;

        let mut prototypes = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            let prototype: Prototype = serde_json::from_slice(value.value())?;
            if keep(&prototype) {
                prototypes.push(prototype);
            }
        }

        Ok(prototypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrototypeCreate;
    use tempfile::tempdir;

    fn storage() -> (tempfile::TempDir, PrototypeStorage) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = PrototypeStorage::new(db).unwrap();
        (temp_dir, storage)
    }

    fn sample(title: &str, owner: Uuid, visibility: Visibility) -> Prototype {
        Prototype::new(
            PrototypeCreate {
                title: title.to_string(),
                description: None,
                content: serde_json::json!({}),
                visibility,
            },
            owner,
        )
    }

    #[test]
    fn test_create_get_delete() {
        let (_dir, storage) = storage();
        let proto = sample("demo", Uuid::new_v4(), Visibility::Private);

        storage.create(&proto).unwrap();
        let loaded = storage.get(proto.id).unwrap().unwrap();
        assert_eq!(loaded.title, "demo");

        assert!(storage.delete(proto.id).unwrap());
        assert!(storage.get(proto.id).unwrap().is_none());
        assert!(!storage.delete(proto.id).unwrap());
    }

    #[test]
    fn test_update_unknown_id() {
        let (_dir, storage) = storage();
        let proto = sample("ghost", Uuid::new_v4(), Visibility::Private);

        assert!(!storage.update(&proto).unwrap());
    }

    #[test]
    fn test_list_filters() {
        let (_dir, storage) = storage();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        storage.create(&sample("a1", alice, Visibility::Private)).unwrap();
        storage.create(&sample("a2", alice, Visibility::Public)).unwrap();
        storage.create(&sample("b1", bob, Visibility::Private)).unwrap();

        assert_eq!(storage.list_by_owner(alice).unwrap().len(), 2);
        assert_eq!(storage.list_by_owner(bob).unwrap().len(), 1);

        let public = storage.list_public().unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "a2");
    }
}
