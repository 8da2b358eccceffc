//! Salted password hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash a password with a fresh random salt, stored as `salt$hex-digest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    let Some((salt, expected)) = hashed.split_once('$') else {
        return false;
    };
    digest(salt, password) == expected
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
