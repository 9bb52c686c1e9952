//! Shared application state and service endpoints.

use axum::Json;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use super::auth::AuthManager;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            auth: AuthManager::new(db.clone()),
            db,
        }
    }
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
