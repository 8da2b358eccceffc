//! Access decisions for prototypes.
//!
//! Permission forms a strict ladder: none < viewer < editor < owner, but
//! call sites ask three independent questions, so the ladder is exposed as
//! three predicates instead of one ranked value. Owner-only actions
//! (delete, collaborator management) are never satisfiable by any role.
//!
//! The predicates are pure aside from read-only grant lookups and never
//! return domain errors; callers turn a `false` into whatever rejection
//! their interface calls for.

use crate::models::{Prototype, Role, Visibility};
use anyhow::Result;
use uuid::Uuid;

/// Read-only lookup of a subject's grant on a prototype.
///
/// Implemented by the collaborator storage; tests substitute an in-memory
/// map.
pub trait GrantLookup {
    fn role_of(&self, prototype_id: Uuid, user_id: Uuid) -> Result<Option<Role>>;
}

impl GrantLookup for crate::storage::CollaboratorStorage {
    fn role_of(&self, prototype_id: Uuid, user_id: Uuid) -> Result<Option<Role>> {
        Ok(self.get(prototype_id, user_id)?.map(|grant| grant.role))
    }
}

pub struct AccessPolicy<'a, G: GrantLookup> {
    grants: &'a G,
}

impl<'a, G: GrantLookup> AccessPolicy<'a, G> {
    pub fn new(grants: &'a G) -> Self {
        Self { grants }
    }

    /// Read access: public visibility, ownership, or any grant.
    pub fn can_access(&self, subject: Uuid, prototype: &Prototype) -> Result<bool> {
        if prototype.visibility == Visibility::Public {
            return Ok(true);
        }
        if self.is_owner(subject, prototype) {
            return Ok(true);
        }
        Ok(self.grants.role_of(prototype.id, subject)?.is_some())
    }

    /// Write access: ownership or an editor grant. Viewers cannot edit.
    pub fn can_edit(&self, subject: Uuid, prototype: &Prototype) -> Result<bool> {
        if self.is_owner(subject, prototype) {
            return Ok(true);
        }
        Ok(self.grants.role_of(prototype.id, subject)? == Some(Role::Editor))
    }

    /// Delete and collaborator management, exclusive to the owner.
    pub fn is_owner(&self, subject: Uuid, prototype: &Prototype) -> bool {
        prototype.owner_id == subject
    }
}
