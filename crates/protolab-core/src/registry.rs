//! Mutations on the collaborator-grant relation.
//!
//! The registry performs no authorization of its own: callers verify
//! ownership (for add/update/remove) or access (for list) through
//! [`crate::policy::AccessPolicy`] before invoking it. It enforces only
//! the relation's own invariants: one grant per pair, never the owner.

use crate::error::{CoreError, Result};
use crate::models::{CollaboratorGrant, Prototype, Role, User};
use crate::storage::CollaboratorStorage;
use uuid::Uuid;

pub struct CollaboratorRegistry<'a> {
    grants: &'a CollaboratorStorage,
}

impl<'a> CollaboratorRegistry<'a> {
    pub fn new(grants: &'a CollaboratorStorage) -> Self {
        Self { grants }
    }

    /// Grant a resolved user access to a prototype.
    ///
    /// Fails with [`CoreError::InvalidGrantee`] when the grantee is the
    /// owner, and [`CoreError::AlreadyCollaborator`] when the pair already
    /// holds a grant. The existence check and insert are one storage
    /// transaction, so concurrent adds for the same pair produce exactly
    /// one success.
    pub fn add(&self, prototype: &Prototype, grantee: &User, role: Role) -> Result<CollaboratorGrant> {
        if grantee.id == prototype.owner_id {
            return Err(CoreError::InvalidGrantee);
        }

        let grant = CollaboratorGrant::new(prototype.id, grantee.id, role);
        if !self.grants.insert_new(&grant)? {
            return Err(CoreError::AlreadyCollaborator(grantee.id));
        }

        tracing::debug!(prototype = %prototype.id, user = %grantee.id, "collaborator added");
        Ok(grant)
    }

    /// Change an existing grant's role. A no-op when the role is unchanged.
    pub fn update_role(
        &self,
        prototype_id: Uuid,
        grantee_id: Uuid,
        new_role: Role,
    ) -> Result<CollaboratorGrant> {
        self.grants
            .update_role(prototype_id, grantee_id, new_role)?
            .ok_or(CoreError::CollaboratorNotFound(grantee_id))
    }

    /// Revoke a grant.
    pub fn remove(&self, prototype_id: Uuid, grantee_id: Uuid) -> Result<()> {
        if !self.grants.remove(prototype_id, grantee_id)? {
            return Err(CoreError::CollaboratorNotFound(grantee_id));
        }
        tracing::debug!(prototype = %prototype_id, user = %grantee_id, "collaborator removed");
        Ok(())
    }

    /// All current grants for a prototype; empty when it has none.
    pub fn list(&self, prototype_id: Uuid) -> Result<Vec<CollaboratorGrant>> {
        Ok(self.grants.list_for_prototype(prototype_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrototypeCreate, Visibility};
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn grants() -> (tempfile::TempDir, CollaboratorStorage) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = CollaboratorStorage::new(db).unwrap();
        (temp_dir, storage)
    }

    fn user(email: &str) -> User {
        User::new(email.to_string(), None, "hash".to_string())
    }

    fn prototype(owner: Uuid) -> Prototype {
        Prototype::new(
            PrototypeCreate {
                title: "p".to_string(),
                description: None,
                content: serde_json::json!({}),
                visibility: Visibility::Private,
            },
            owner,
        )
    }

    #[test]
    fn test_add_rejects_owner() {
        let (_dir, grants) = grants();
        let registry = CollaboratorRegistry::new(&grants);

        let owner = user("owner@example.com");
        let proto = prototype(owner.id);

        let err = registry.add(&proto, &owner, Role::Viewer).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGrantee));
        assert!(registry.list(proto.id).unwrap().is_empty());
    }

    #[test]
    fn test_add_twice_fails_once() {
        let (_dir, grants) = grants();
        let registry = CollaboratorRegistry::new(&grants);

        let proto = prototype(Uuid::new_v4());
        let bob = user("bob@example.com");

        registry.add(&proto, &bob, Role::Viewer).unwrap();
        let err = registry.add(&proto, &bob, Role::Editor).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyCollaborator(id) if id == bob.id));

        let listed = registry.list(proto.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].role, Role::Viewer);
    }

    #[test]
    fn test_update_role_is_idempotent() {
        let (_dir, grants) = grants();
        let registry = CollaboratorRegistry::new(&grants);

        let proto = prototype(Uuid::new_v4());
        let bob = user("bob@example.com");
        registry.add(&proto, &bob, Role::Viewer).unwrap();

        let same = registry.update_role(proto.id, bob.id, Role::Viewer).unwrap();
        assert_eq!(same.role, Role::Viewer);

        let changed = registry.update_role(proto.id, bob.id, Role::Editor).unwrap();
        assert_eq!(changed.role, Role::Editor);
        assert_eq!(registry.list(proto.id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_and_remove_on_absent_pair() {
        let (_dir, grants) = grants();
        let registry = CollaboratorRegistry::new(&grants);

        let proto = prototype(Uuid::new_v4());
        let bob = user("bob@example.com");

        let err = registry.update_role(proto.id, bob.id, Role::Editor).unwrap_err();
        assert!(matches!(err, CoreError::CollaboratorNotFound(_)));

        let err = registry.remove(proto.id, bob.id).unwrap_err();
        assert!(matches!(err, CoreError::CollaboratorNotFound(_)));
    }

    #[test]
    fn test_grant_round_trip() {
        let (_dir, grants) = grants();
        let registry = CollaboratorRegistry::new(&grants);

        let proto = prototype(Uuid::new_v4());
        let bob = user("bob@example.com");

        registry.add(&proto, &bob, Role::Editor).unwrap();
        let listed = registry.list(proto.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, bob.id);
        assert_eq!(listed[0].role, Role::Editor);

        registry.remove(proto.id, bob.id).unwrap();
        assert!(registry.list(proto.id).unwrap().is_empty());

        let err = registry.remove(proto.id, bob.id).unwrap_err();
        assert!(matches!(err, CoreError::CollaboratorNotFound(_)));
    }
}
