//! A small content-publishing site: authors publish reviews, readers browse a
//! paginated, tag-filterable listing, open detail pages, and post discussion
//! entries; an admin section handles authoring and moderation.

pub mod api;
pub mod db;
pub mod error;
pub mod web_ui;

use std::sync::Arc;

use axum::{routing::get, Router};

use api::AppState;

/// Build the full application router. The binary serves this directly and
/// integration tests drive it in-process.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .merge(web_ui::router())
        .with_state(state)
}
