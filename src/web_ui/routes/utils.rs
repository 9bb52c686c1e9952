//! Shared utilities and helper functions for web UI.

use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use sea_orm::prelude::DateTimeUtc;
use sha2::{Digest, Sha256};
use tera::Context;

use crate::api::AppState;
use crate::db::entities::user;
use crate::error::Result;
use crate::web_ui::templates;

/// Render a template into an HTML response
pub fn render_template(name: &str, context: &Context) -> Result<Response> {
    let html = templates::render(name, context)?;
    Ok(Html(html).into_response())
}

/// Extract the session token from the cookie header
pub fn get_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get("cookie")?.to_str().ok()?;
    for part in cookie_header.split(';') {
        if let Some(token) = part.trim().strip_prefix("token=") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

/// Resolve the current account from the session cookie
pub async fn get_current_user(state: &AppState, headers: &HeaderMap) -> Option<user::Model> {
    let token = get_session_token(headers)?;
    state.auth.user_for_token(&token).await
}

/// Add current user to context if logged in
pub async fn add_user_to_context(context: &mut Context, state: &AppState, headers: &HeaderMap) {
    if let Some(account) = get_current_user(state, headers).await {
        context.insert("current_user", &account.username);
        context.insert("current_user_is_admin", &account.is_admin);
    }
}

/// Form token derived from the session token
pub fn csrf_token_for(session_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"review-server-csrf:");
    hasher.update(session_token.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Check a submitted form token against the session
pub fn verify_csrf_token(provided: &str, session_token: Option<&str>) -> bool {
    match session_token {
        Some(session) => !provided.is_empty() && csrf_token_for(session) == provided,
        None => false,
    }
}

/// Add a form token to the context when a session cookie is present
pub fn add_csrf_to_context(context: &mut Context, headers: &HeaderMap) {
    if let Some(session) = get_session_token(headers) {
        context.insert("csrf_token", &csrf_token_for(&session));
    }
}

/// Format seconds ago as human-readable string
pub fn format_time_ago(seconds: i64) -> String {
    if seconds < 0 {
        return "in the future".to_string();
    }
    if seconds < 60 {
        return format!("{} seconds ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" });
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" });
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{} day{} ago", days, if days == 1 { "" } else { "s" });
    }
    let months = days / 30;
    if months < 12 {
        return format!("{} month{} ago", months, if months == 1 { "" } else { "s" });
    }
    let years = months / 12;
    format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
}

/// Format a timestamp as a relative time string
pub fn format_relative_time(timestamp: &DateTimeUtc) -> String {
    format_time_ago((Utc::now() - *timestamp).num_seconds())
}

/// Format a timestamp as a calendar date for display
pub fn format_date(timestamp: &DateTimeUtc) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}

/// Reduce free-form text to a URL-safe slug
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_dash = true;
    for c in input.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
