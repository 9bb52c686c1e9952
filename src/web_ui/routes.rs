//! Web UI routes.

pub mod admin_handlers;
pub mod auth_handlers;
pub mod discussion_handlers;
pub mod review_handlers;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router with all routes
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public listing and detail
        .route("/", get(review_handlers::review_list))
        .route("/tag/:tag_slug", get(review_handlers::review_list_by_tag))
        .route(
            "/:year/:month/:day/:slug",
            get(review_handlers::review_detail),
        )
        // Discussions (auth required)
        .route(
            "/reviews/:review_id/discuss",
            post(discussion_handlers::create_discussion),
        )
        .route(
            "/discussions/:id/edit",
            get(discussion_handlers::edit_discussion_page)
                .post(discussion_handlers::update_discussion),
        )
        .route(
            "/discussions/:id/delete",
            get(discussion_handlers::delete_discussion_page)
                .post(discussion_handlers::delete_discussion),
        )
        // Session pages
        .route(
            "/-/login",
            get(auth_handlers::login_page).post(auth_handlers::login_submit),
        )
        .route(
            "/-/signup",
            get(auth_handlers::signup_page).post(auth_handlers::signup_submit),
        )
        .route("/-/logout", get(auth_handlers::logout))
        // Admin section
        .route("/admin/reviews", get(admin_handlers::admin_reviews))
        .route(
            "/admin/reviews/new",
            get(admin_handlers::new_review_page).post(admin_handlers::create_review),
        )
        .route(
            "/admin/reviews/:id/edit",
            get(admin_handlers::edit_review_page).post(admin_handlers::update_review),
        )
        .route("/admin/discussions", get(admin_handlers::admin_discussions))
        .route(
            "/admin/discussions/:id/toggle",
            post(admin_handlers::toggle_discussion),
        )
}
