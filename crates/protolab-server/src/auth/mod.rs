pub mod middleware;
pub mod password;
pub mod tokens;

pub use middleware::{CurrentUser, require_auth};
