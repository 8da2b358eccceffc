//! User storage with a unique email index.

use crate::models::User;
use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const USER_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("user");
// email -> user id, kept in the same write transaction as the row
const USER_EMAIL_TABLE: TableDefinition<&str, &str> = TableDefinition::new("user_email");

#[derive(Debug, Clone)]
pub struct UserStorage {
    db: Arc<Database>,
}

/// Canonical form used for the email index: lookups must resolve the
/// same account regardless of how the caller cased or padded the address.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(USER_TABLE)?;
        write_txn.open_table(USER_EMAIL_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a new user. Returns `false` if the email is already taken.
    ///
    /// The email index is keyed by the normalized address, so uniqueness
    /// is case-insensitive.
    pub fn create(&self, user: &User) -> Result<bool> {
        let id = user.id.to_string();
        let email = normalize_email(&user.email);
        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAIL_TABLE)?;
            if emails.get(email.as_str())?.is_some() {
                return Ok(false);
            }
            emails.insert(email.as_str(), id.as_str())?;

            let mut table = write_txn.open_table(USER_TABLE)?;
            let json_bytes = serde_json::to_vec(user)?;
            table.insert(id.as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USER_TABLE)?;

        if let Some(value) = table.get(id.to_string().as_str())? {
            let user: User = serde_json::from_slice(value.value())?;
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAIL_TABLE)?;

        let Some(id) = emails.get(email.as_str())? else {
            return Ok(None);
        };

        let table = read_txn.open_table(USER_TABLE)?;
        if let Some(value) = table.get(id.value())? {
            let user: User = serde_json::from_slice(value.value())?;
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn storage() -> (tempfile::TempDir, UserStorage) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = UserStorage::new(db).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_get() {
        let (_dir, storage) = storage();

        let user = User::new("alice@example.com".into(), Some("Alice".into()), "h".into());
        assert!(storage.create(&user).unwrap());

        let by_id = storage.get(user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = storage.get_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_dir, storage) = storage();

        let first = User::new("bob@example.com".into(), None, "h1".into());
        let second = User::new("bob@example.com".into(), None, "h2".into());

        assert!(storage.create(&first).unwrap());
        assert!(!storage.create(&second).unwrap());

        // The index still points at the first user
        let resolved = storage.get_by_email("bob@example.com").unwrap().unwrap();
        assert_eq!(resolved.id, first.id);
    }

    #[test]
    fn test_mixed_case_email_round_trip() {
        let (_dir, storage) = storage();

        let user = User::new("Bob@X.com".into(), None, "h".into());
        assert!(storage.create(&user).unwrap());

        // The exact string the user registered with resolves, as does any
        // other casing or padding of the same address
        for lookup in ["Bob@X.com", "bob@x.com", " BOB@X.COM "] {
            let resolved = storage.get_by_email(lookup).unwrap().unwrap();
            assert_eq!(resolved.id, user.id);
        }

        // Uniqueness is case-insensitive too
        let clash = User::new("BOB@x.com".into(), None, "h2".into());
        assert!(!storage.create(&clash).unwrap());
    }

    #[test]
    fn test_missing_user() {
        let (_dir, storage) = storage();

        assert!(storage.get(Uuid::new_v4()).unwrap().is_none());
        assert!(storage.get_by_email("nobody@example.com").unwrap().is_none());
    }
}
