pub mod collaborator;
pub mod prototype;
pub mod user;

pub use collaborator::{CollaboratorGrant, CollaboratorInfo, Role};
pub use prototype::{Prototype, PrototypeCreate, PrototypeUpdate, Visibility};
pub use user::{User, UserPublic};
