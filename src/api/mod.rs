pub mod auth;
pub mod handlers;

pub use auth::AuthManager;
pub use handlers::{health, AppState};
