//! Admin handlers: browse all content, author reviews, moderate discussions.
//!
//! Everything here runs over the unrestricted record view, so drafts are
//! visible. Non-admin callers get a plain not-found page; whether the section
//! exists is not revealed.

use axum::{
    extract::{Form, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use tera::Context;

use crate::api::AppState;
use crate::db::entities::review::ReviewStatus;
use crate::db::entities::{discussion, review, review_tag, tag, user};
use crate::db::queries;
use crate::error::{Result, ServerError};

use super::utils::{
    add_csrf_to_context, add_user_to_context, format_date, get_current_user, get_session_token,
    render_template, slugify, verify_csrf_token,
};

#[derive(serde::Deserialize)]
pub struct ReviewFilter {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct DiscussionFilter {
    pub active: Option<String>,
    pub q: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ReviewForm {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: String,
    pub tags: String,
    pub csrf_token: String,
}

#[derive(serde::Deserialize)]
pub struct ToggleForm {
    pub csrf_token: String,
}

#[derive(serde::Serialize)]
struct AdminReviewRow {
    id: i32,
    title: String,
    slug: String,
    author: String,
    created: String,
    status: &'static str,
}

#[derive(serde::Serialize)]
struct AdminDiscussionRow {
    id: i32,
    author: String,
    review_title: String,
    body: String,
    created: String,
    is_active: bool,
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<user::Model> {
    match get_current_user(state, headers).await {
        Some(account) if account.is_admin => Ok(account),
        _ => Err(ServerError::PageNotFound),
    }
}

fn require_csrf(headers: &HeaderMap, provided: &str) -> Result<()> {
    let session_token = get_session_token(headers);
    if !verify_csrf_token(provided, session_token.as_deref()) {
        return Err(ServerError::InvalidRequest(
            "stale or missing form token".to_string(),
        ));
    }
    Ok(())
}

/// All reviews, drafts included, filterable by status and free-text search
pub async fn admin_reviews(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ReviewFilter>,
    headers: HeaderMap,
) -> Result<Response> {
    require_admin(&state, &headers).await?;

    let mut select = review::Entity::find()
        .order_by_asc(review::Column::Status)
        .order_by_asc(review::Column::CreatedOn);

    let status_filter = filter.status.as_deref().unwrap_or("");
    if !status_filter.is_empty() {
        if let Ok(status) = ReviewStatus::try_from_value(&status_filter.to_string()) {
            select = select.filter(review::Column::Status.eq(status));
        }
    }
    let q = filter.q.as_deref().unwrap_or("").trim();
    if !q.is_empty() {
        select = select.filter(
            Condition::any()
                .add(review::Column::Title.contains(q))
                .add(review::Column::Body.contains(q)),
        );
    }

    let mut rows = Vec::new();
    for r in select.all(&state.db).await? {
        let author = user::Entity::find_by_id(r.author_id)
            .one(&state.db)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "unknown".to_string());
        rows.push(AdminReviewRow {
            id: r.id,
            author,
            created: format_date(&r.created_on),
            status: r.status.label(),
            title: r.title,
            slug: r.slug,
        });
    }

    let mut context = Context::new();
    context.insert("rows", &rows);
    context.insert("status_filter", status_filter);
    context.insert("q", q);
    add_user_to_context(&mut context, &state, &headers).await;

    render_template("admin_reviews.html", &context)
}

/// Blank review form (GET)
pub async fn new_review_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response> {
    require_admin(&state, &headers).await?;

    let mut context = Context::new();
    context.insert("form_action", "/admin/reviews/new");
    context.insert("heading", "New review");
    context.insert("title", "");
    context.insert("slug", "");
    context.insert("body", "");
    context.insert("status", "DF");
    context.insert("tags", "");
    context.insert("form_errors", &Vec::<String>::new());
    add_user_to_context(&mut context, &state, &headers).await;
    add_csrf_to_context(&mut context, &headers);

    render_template("admin_review_form.html", &context)
}

/// Create a review (POST)
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let admin = require_admin(&state, &headers).await?;
    require_csrf(&headers, &form.csrf_token)?;

    if let Err(errors) = validate_review_form(&form) {
        return render_review_form(&state, &headers, "/admin/reviews/new", "New review", &form, &errors)
            .await;
    }

    let now = Utc::now();
    let slug = review_slug(&form);
    let inserted = review::ActiveModel {
        title: Set(form.title.trim().to_string()),
        slug: Set(slug),
        author_id: Set(admin.id),
        body: Set(form.body.clone()),
        status: Set(parse_status(&form.status)),
        created_on: Set(now),
        updated_on: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await;

    let created = match inserted {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Review insert rejected: {}", e);
            let errors = vec!["A review with this slug already exists for today.".to_string()];
            return render_review_form(
                &state,
                &headers,
                "/admin/reviews/new",
                "New review",
                &form,
                &errors,
            )
            .await;
        }
    };

    set_tags(&state.db, created.id, &form.tags).await?;

    Ok(Redirect::to("/admin/reviews").into_response())
}

/// Pre-filled review form (GET)
pub async fn edit_review_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    require_admin(&state, &headers).await?;

    let r = review::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ReviewNotFound)?;

    let tags_csv = r
        .find_related(tag::Entity)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = Context::new();
    context.insert("form_action", &format!("/admin/reviews/{}/edit", r.id));
    context.insert("heading", &format!("Edit '{}'", r.title));
    context.insert("title", &r.title);
    context.insert("slug", &r.slug);
    context.insert("body", &r.body);
    context.insert("status", &r.status.to_value());
    context.insert("tags", &tags_csv);
    context.insert("form_errors", &Vec::<String>::new());
    add_user_to_context(&mut context, &state, &headers).await;
    add_csrf_to_context(&mut context, &headers);

    render_template("admin_review_form.html", &context)
}

/// Apply edits to a review (POST)
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    require_admin(&state, &headers).await?;
    require_csrf(&headers, &form.csrf_token)?;

    let r = review::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::ReviewNotFound)?;

    let action = format!("/admin/reviews/{}/edit", r.id);
    if let Err(errors) = validate_review_form(&form) {
        let heading = format!("Edit '{}'", r.title);
        return render_review_form(&state, &headers, &action, &heading, &form, &errors).await;
    }

    let review_id = r.id;
    let heading = format!("Edit '{}'", r.title);
    let mut active: review::ActiveModel = r.into();
    active.title = Set(form.title.trim().to_string());
    active.slug = Set(review_slug(&form));
    active.body = Set(form.body.clone());
    active.status = Set(parse_status(&form.status));
    // created_on is write-once; only updated_on moves
    active.updated_on = Set(Utc::now());

    if let Err(e) = active.update(&state.db).await {
        tracing::warn!("Review update rejected: {}", e);
        let errors = vec!["A review with this slug already exists for that day.".to_string()];
        return render_review_form(&state, &headers, &action, &heading, &form, &errors).await;
    }

    set_tags(&state.db, review_id, &form.tags).await?;

    Ok(Redirect::to("/admin/reviews").into_response())
}

/// All discussions, moderated ones included, filterable and searchable
pub async fn admin_discussions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DiscussionFilter>,
    headers: HeaderMap,
) -> Result<Response> {
    require_admin(&state, &headers).await?;

    let mut select = discussion::Entity::find().order_by_asc(discussion::Column::CreatedOn);

    let active_filter = filter.active.as_deref().unwrap_or("");
    match active_filter {
        "1" => select = select.filter(discussion::Column::IsActive.eq(true)),
        "0" => select = select.filter(discussion::Column::IsActive.eq(false)),
        _ => {}
    }
    let q = filter.q.as_deref().unwrap_or("").trim();
    if !q.is_empty() {
        select = select.filter(discussion::Column::Body.contains(q));
    }

    let mut rows = Vec::new();
    for d in select.all(&state.db).await? {
        let author = user::Entity::find_by_id(d.user_id)
            .one(&state.db)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "unknown".to_string());
        let review_title = review::Entity::find_by_id(d.review_id)
            .one(&state.db)
            .await?
            .map(|r| r.title)
            .unwrap_or_else(|| "unknown".to_string());
        rows.push(AdminDiscussionRow {
            id: d.id,
            author,
            review_title,
            body: d.body,
            created: format_date(&d.created_on),
            is_active: d.is_active,
        });
    }

    let mut context = Context::new();
    context.insert("rows", &rows);
    context.insert("active_filter", active_filter);
    context.insert("q", q);
    add_user_to_context(&mut context, &state, &headers).await;
    add_csrf_to_context(&mut context, &headers);

    render_template("admin_discussions.html", &context)
}

/// Flip a discussion's moderation flag (POST)
pub async fn toggle_discussion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    require_admin(&state, &headers).await?;
    require_csrf(&headers, &form.csrf_token)?;

    let d = discussion::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(ServerError::DiscussionNotFound)?;

    let flipped = !d.is_active;
    let mut active: discussion::ActiveModel = d.into();
    active.is_active = Set(flipped);
    active.updated_on = Set(Utc::now());
    active.update(&state.db).await?;

    Ok(Redirect::to("/admin/discussions").into_response())
}

fn validate_review_form(form: &ReviewForm) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if form.title.trim().is_empty() {
        errors.push("Title is required.".to_string());
    }
    if form.body.trim().is_empty() {
        errors.push("Body is required.".to_string());
    }
    if review_slug(form).is_empty() {
        errors.push("Slug cannot be derived; provide one.".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Slug from the form, derived from the title when the slug field is blank
fn review_slug(form: &ReviewForm) -> String {
    let source = if form.slug.trim().is_empty() {
        &form.title
    } else {
        &form.slug
    };
    slugify(source)
}

fn parse_status(code: &str) -> ReviewStatus {
    ReviewStatus::try_from_value(&code.to_string()).unwrap_or_default()
}

async fn render_review_form(
    state: &AppState,
    headers: &HeaderMap,
    action: &str,
    heading: &str,
    form: &ReviewForm,
    errors: &[String],
) -> Result<Response> {
    let mut context = Context::new();
    context.insert("form_action", action);
    context.insert("heading", heading);
    context.insert("title", &form.title);
    context.insert("slug", &form.slug);
    context.insert("body", &form.body);
    context.insert("status", &form.status);
    context.insert("tags", &form.tags);
    context.insert("form_errors", errors);
    add_user_to_context(&mut context, state, headers).await;
    add_csrf_to_context(&mut context, headers);

    render_template("admin_review_form.html", &context)
}

/// Replace a review's tag set from a comma-separated list, creating tags
/// on first use.
async fn set_tags(db: &DatabaseConnection, review_id: i32, raw: &str) -> Result<()> {
    review_tag::Entity::delete_many()
        .filter(review_tag::Column::ReviewId.eq(review_id))
        .exec(db)
        .await?;

    let mut seen = HashSet::new();
    for part in raw.split(',') {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        let slug = slugify(name);
        if slug.is_empty() || !seen.insert(slug.clone()) {
            continue;
        }

        let tag_row = match queries::find_tag(db, &slug).await? {
            Some(t) => t,
            None => {
                tag::ActiveModel {
                    name: Set(name.to_string()),
                    slug: Set(slug),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };

        review_tag::ActiveModel {
            review_id: Set(review_id),
            tag_id: Set(tag_row.id),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
