//! Prototype operations with authorization applied.
//!
//! This is the layer the HTTP handlers call: every operation resolves the
//! prototype, consults [`AccessPolicy`], and only then touches storage or
//! the [`CollaboratorRegistry`].
//!
//! Existence-leak policy: a subject that cannot access a private prototype
//! gets the same `PrototypeNotFound` as a genuinely missing id. `Forbidden`
//! is reserved for subjects that can see the prototype but lack the tier
//! for the attempted action.

use crate::error::{CoreError, Result};
use crate::models::{
    CollaboratorInfo, Prototype, PrototypeCreate, PrototypeUpdate, Role,
    prototype::{DESCRIPTION_MAX_LEN, TITLE_MAX_LEN},
};
use crate::policy::AccessPolicy;
use crate::registry::CollaboratorRegistry;
use crate::storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PrototypeService {
    storage: Arc<Storage>,
}

impl PrototypeService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    fn policy(&self) -> AccessPolicy<'_, crate::storage::CollaboratorStorage> {
        AccessPolicy::new(&self.storage.collaborators)
    }

    fn registry(&self) -> CollaboratorRegistry<'_> {
        CollaboratorRegistry::new(&self.storage.collaborators)
    }

    /// Fetch a prototype the subject is allowed to see.
    fn fetch_visible(&self, subject: Uuid, id: Uuid) -> Result<Prototype> {
        let prototype = self
            .storage
            .prototypes
            .get(id)?
            .ok_or(CoreError::PrototypeNotFound(id))?;

        if !self.policy().can_access(subject, &prototype)? {
            // Indistinguishable from a missing id
            return Err(CoreError::PrototypeNotFound(id));
        }

        Ok(prototype)
    }

    fn require_owner(&self, subject: Uuid, prototype: &Prototype) -> Result<()> {
        if !self.policy().is_owner(subject, prototype) {
            return Err(CoreError::Forbidden);
        }
        Ok(())
    }

    pub fn create(&self, owner: Uuid, input: PrototypeCreate) -> Result<Prototype> {
        validate_title(&input.title)?;
        validate_description(input.description.as_deref())?;

        let prototype = Prototype::new(input, owner);
        self.storage.prototypes.create(&prototype)?;
        tracing::info!(prototype = %prototype.id, owner = %owner, "prototype created");
        Ok(prototype)
    }

    pub fn get(&self, subject: Uuid, id: Uuid) -> Result<Prototype> {
        self.fetch_visible(subject, id)
    }

    /// Fetch without a subject; serves only PUBLIC prototypes.
    pub fn get_public(&self, id: Uuid) -> Result<Prototype> {
        let prototype = self
            .storage
            .prototypes
            .get(id)?
            .ok_or(CoreError::PrototypeNotFound(id))?;

        if prototype.visibility != crate::models::Visibility::Public {
            return Err(CoreError::PrototypeNotFound(id));
        }

        Ok(prototype)
    }

    pub fn update(&self, subject: Uuid, id: Uuid, input: PrototypeUpdate) -> Result<Prototype> {
        if let Some(title) = input.title.as_deref() {
            validate_title(title)?;
        }
        validate_description(input.description.as_ref().and_then(|d| d.as_deref()))?;

        let mut prototype = self.fetch_visible(subject, id)?;
        if !self.policy().can_edit(subject, &prototype)? {
            return Err(CoreError::Forbidden);
        }

        prototype.apply(input);
        if !self.storage.prototypes.update(&prototype)? {
            return Err(CoreError::PrototypeNotFound(id));
        }
        Ok(prototype)
    }

    /// Owner-only. Cascades the prototype's collaborator grants.
    pub fn delete(&self, subject: Uuid, id: Uuid) -> Result<()> {
        let prototype = self.fetch_visible(subject, id)?;
        self.require_owner(subject, &prototype)?;

        if !self.storage.prototypes.delete(id)? {
            return Err(CoreError::PrototypeNotFound(id));
        }
        let dropped = self.storage.collaborators.remove_all_for_prototype(id)?;
        tracing::info!(prototype = %id, grants = dropped, "prototype deleted");
        Ok(())
    }

    /// Prototypes the subject owns or is a collaborator on.
    pub fn list_for_user(&self, subject: Uuid) -> Result<Vec<Prototype>> {
        let mut prototypes = self.storage.prototypes.list_by_owner(subject)?;

        // Owners never hold grants, so the two sets are disjoint
        for id in self.storage.collaborators.prototype_ids_for_user(subject)? {
            if let Some(prototype) = self.storage.prototypes.get(id)? {
                prototypes.push(prototype);
            }
        }

        Ok(prototypes)
    }

    pub fn list_public(&self) -> Result<Vec<Prototype>> {
        Ok(self.storage.prototypes.list_public()?)
    }

    pub fn collaborators(&self, subject: Uuid, id: Uuid) -> Result<Vec<CollaboratorInfo>> {
        let prototype = self.fetch_visible(subject, id)?;

        let mut infos = Vec::new();
        for grant in self.registry().list(prototype.id)? {
            match self.storage.users.get(grant.user_id)? {
                Some(user) => infos.push(CollaboratorInfo {
                    user_id: user.id,
                    email: user.email,
                    role: grant.role,
                }),
                None => {
                    tracing::warn!(prototype = %id, user = %grant.user_id, "grant for unknown user")
                }
            }
        }

        Ok(infos)
    }

    /// Owner-only. The grantee is identified by email here at the boundary;
    /// the relation itself is keyed by user id.
    pub fn add_collaborator(
        &self,
        subject: Uuid,
        id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<CollaboratorInfo> {
        let prototype = self.fetch_visible(subject, id)?;
        self.require_owner(subject, &prototype)?;

        let grantee = self
            .storage
            .users
            .get_by_email(email)?
            .ok_or_else(|| CoreError::UserNotFound(email.to_string()))?;

        let grant = self.registry().add(&prototype, &grantee, role)?;
        Ok(CollaboratorInfo {
            user_id: grantee.id,
            email: grantee.email,
            role: grant.role,
        })
    }

    /// Owner-only.
    pub fn update_collaborator(
        &self,
        subject: Uuid,
        id: Uuid,
        grantee_id: Uuid,
        role: Role,
    ) -> Result<CollaboratorInfo> {
        let prototype = self.fetch_visible(subject, id)?;
        self.require_owner(subject, &prototype)?;

        let grant = self.registry().update_role(prototype.id, grantee_id, role)?;
        let grantee = self
            .storage
            .users
            .get(grantee_id)?
            .ok_or_else(|| CoreError::UserNotFound(grantee_id.to_string()))?;

        Ok(CollaboratorInfo {
            user_id: grantee.id,
            email: grantee.email,
            role: grant.role,
        })
    }

    /// Owner-only.
    pub fn remove_collaborator(&self, subject: Uuid, id: Uuid, grantee_id: Uuid) -> Result<()> {
        let prototype = self.fetch_visible(subject, id)?;
        self.require_owner(subject, &prototype)?;

        self.registry().remove(prototype.id, grantee_id)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(CoreError::Validation(format!(
                "description must be at most {DESCRIPTION_MAX_LEN} characters"
            )));
        }
    }
    Ok(())
}
