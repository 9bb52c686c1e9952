//! Web UI Module
//!
//! The HTML face of the site: public listing and detail pages, discussion
//! forms, session pages, and the admin section.

pub mod routes;
pub(crate) mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router.
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
