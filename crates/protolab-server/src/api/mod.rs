pub mod error;
pub mod login;
pub mod prototypes;
pub mod state;
pub mod users;

pub use error::ApiError;
pub use state::AppState;
