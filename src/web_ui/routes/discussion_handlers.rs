//! Discussion handlers: create, edit, and delete entries under a review.

use axum::{
    extract::{Form, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use std::sync::Arc;
use tera::Context;

use crate::api::AppState;
use crate::db::entities::{discussion, review};
use crate::db::queries;
use crate::error::{Result, ServerError};

use super::review_handlers::render_detail_page;
use super::utils::{
    add_csrf_to_context, add_user_to_context, get_current_user, get_session_token, render_template,
    verify_csrf_token,
};

/// Form for posting or editing a discussion entry
#[derive(serde::Deserialize)]
pub struct DiscussionForm {
    pub body: String,
    pub csrf_token: String,
}

/// Form for the delete confirmation submit
#[derive(serde::Deserialize)]
pub struct ConfirmForm {
    pub csrf_token: String,
}

/// Check a submitted body against the non-empty and length bounds.
/// Returns the stripped body ready to persist.
fn validate_body(raw: &str) -> std::result::Result<String, String> {
    let stripped = raw.trim();
    if stripped.is_empty() {
        return Err("Discussion text is required.".to_string());
    }
    if stripped.chars().count() > discussion::BODY_MAX_CHARS {
        return Err(format!(
            "Keep discussions to {} characters or fewer.",
            discussion::BODY_MAX_CHARS
        ));
    }
    Ok(stripped.to_string())
}

/// Look up a discussion the given user owns. Ownership is part of the lookup
/// key, so a record owned by someone else is indistinguishable from a missing
/// one.
async fn owned_discussion(
    db: &DatabaseConnection,
    id: i32,
    user_id: i32,
) -> Result<discussion::Model> {
    discussion::Entity::find()
        .filter(discussion::Column::Id.eq(id))
        .filter(discussion::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(ServerError::DiscussionNotFound)
}

async fn parent_review(db: &DatabaseConnection, d: &discussion::Model) -> Result<review::Model> {
    review::Entity::find_by_id(d.review_id)
        .one(db)
        .await?
        .ok_or(ServerError::ReviewNotFound)
}

/// Post a new discussion under a published review (POST)
pub async fn create_discussion(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<DiscussionForm>,
) -> Result<Response> {
    let Some(current) = get_current_user(&state, &headers).await else {
        return Ok(
            Redirect::to("/-/login?error=Please+sign+in+to+join+the+discussion").into_response(),
        );
    };

    let session_token = get_session_token(&headers);
    if !verify_csrf_token(&form.csrf_token, session_token.as_deref()) {
        return Err(ServerError::InvalidRequest(
            "stale or missing form token".to_string(),
        ));
    }

    let review = queries::find_published_by_id(&state.db, review_id)
        .await?
        .ok_or(ServerError::ReviewNotFound)?;

    match validate_body(&form.body) {
        Ok(body) => {
            let now = Utc::now();
            discussion::ActiveModel {
                review_id: Set(review.id),
                user_id: Set(current.id),
                body: Set(body),
                created_on: Set(now),
                updated_on: Set(now),
                is_active: Set(true),
                ..Default::default()
            }
            .insert(&state.db)
            .await?;

            Ok(Redirect::to(&review.detail_path()).into_response())
        }
        Err(message) => render_detail_page(&state, &headers, review, &form.body, &[message]).await,
    }
}

/// Edit form for an owned discussion (GET)
pub async fn edit_discussion_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(current) = get_current_user(&state, &headers).await else {
        return Ok(Redirect::to("/-/login?error=Please+sign+in").into_response());
    };

    let d = owned_discussion(&state.db, id, current.id).await?;
    let review = parent_review(&state.db, &d).await?;

    render_edit_form(&state, &headers, &d, &review, &d.body, &[]).await
}

/// Apply an edit to an owned discussion (POST)
pub async fn update_discussion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<DiscussionForm>,
) -> Result<Response> {
    let Some(current) = get_current_user(&state, &headers).await else {
        return Ok(Redirect::to("/-/login?error=Please+sign+in").into_response());
    };

    let session_token = get_session_token(&headers);
    if !verify_csrf_token(&form.csrf_token, session_token.as_deref()) {
        return Err(ServerError::InvalidRequest(
            "stale or missing form token".to_string(),
        ));
    }

    let d = owned_discussion(&state.db, id, current.id).await?;
    let review = parent_review(&state.db, &d).await?;

    match validate_body(&form.body) {
        Ok(body) => {
            // Only the body moves; created_on, owner, and moderation state stay put
            let mut active: discussion::ActiveModel = d.into();
            active.body = Set(body);
            active.updated_on = Set(Utc::now());
            active.update(&state.db).await?;

            Ok(Redirect::to(&review.detail_path()).into_response())
        }
        Err(message) => {
            render_edit_form(&state, &headers, &d, &review, &form.body, &[message]).await
        }
    }
}

/// Delete confirmation for an owned discussion (GET)
pub async fn delete_discussion_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(current) = get_current_user(&state, &headers).await else {
        return Ok(Redirect::to("/-/login?error=Please+sign+in").into_response());
    };

    let d = owned_discussion(&state.db, id, current.id).await?;
    let review = parent_review(&state.db, &d).await?;

    let mut context = Context::new();
    context.insert("discussion_id", &d.id);
    context.insert("body", &d.body);
    context.insert("review_url", &review.detail_path());
    context.insert("review_title", &review.title);
    add_user_to_context(&mut context, &state, &headers).await;
    add_csrf_to_context(&mut context, &headers);

    render_template("delete_discussion.html", &context)
}

/// Permanently remove an owned discussion (POST)
pub async fn delete_discussion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ConfirmForm>,
) -> Result<Response> {
    let Some(current) = get_current_user(&state, &headers).await else {
        return Ok(Redirect::to("/-/login?error=Please+sign+in").into_response());
    };

    let session_token = get_session_token(&headers);
    if !verify_csrf_token(&form.csrf_token, session_token.as_deref()) {
        return Err(ServerError::InvalidRequest(
            "stale or missing form token".to_string(),
        ));
    }

    let d = owned_discussion(&state.db, id, current.id).await?;
    let review = parent_review(&state.db, &d).await?;

    // Hard delete; the is_active moderation flag is a separate mechanism
    d.delete(&state.db).await?;

    Ok(Redirect::to(&review.detail_path()).into_response())
}

async fn render_edit_form(
    state: &AppState,
    headers: &HeaderMap,
    d: &discussion::Model,
    review: &review::Model,
    body: &str,
    errors: &[String],
) -> Result<Response> {
    let mut context = Context::new();
    context.insert("discussion_id", &d.id);
    context.insert("body", body);
    context.insert("form_errors", errors);
    context.insert("review_url", &review.detail_path());
    context.insert("review_title", &review.title);
    add_user_to_context(&mut context, state, headers).await;
    add_csrf_to_context(&mut context, headers);

    render_template("edit_discussion.html", &context)
}
