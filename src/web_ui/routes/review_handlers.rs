//! Review listing and detail pages.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};
use std::sync::Arc;
use tera::Context;

use crate::api::AppState;
use crate::db::entities::{review, tag, user};
use crate::db::queries;
use crate::error::{Result, ServerError};

use super::utils::{
    add_csrf_to_context, add_user_to_context, format_date, format_relative_time, get_current_user,
    render_template,
};

/// Listing query string; the page number arrives raw so junk values can fall
/// back quietly instead of failing extraction.
#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// Review info for templates
#[derive(serde::Serialize)]
struct ReviewInfo {
    id: i32,
    title: String,
    author: String,
    body: String,
    url: String,
    published: String,
    updated: String,
    tags: Vec<TagInfo>,
}

#[derive(serde::Serialize)]
struct TagInfo {
    name: String,
    slug: String,
}

#[derive(serde::Serialize)]
struct MostDiscussedInfo {
    title: String,
    url: String,
    discussion_count: i64,
}

#[derive(serde::Serialize)]
struct DiscussionInfo {
    id: i32,
    author: String,
    body: String,
    created: String,
    is_owner: bool,
}

async fn author_name(state: &AppState, author_id: i32) -> Result<String> {
    Ok(user::Entity::find_by_id(author_id)
        .one(&state.db)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| "unknown".to_string()))
}

async fn review_info(state: &AppState, r: review::Model) -> Result<ReviewInfo> {
    let author = author_name(state, r.author_id).await?;
    let tags = r
        .find_related(tag::Entity)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| TagInfo {
            name: t.name,
            slug: t.slug,
        })
        .collect();

    Ok(ReviewInfo {
        id: r.id,
        author,
        url: r.detail_path(),
        title: r.title,
        body: r.body,
        published: format_date(&r.created_on),
        updated: format_relative_time(&r.updated_on),
        tags,
    })
}

async fn most_discussed_infos(state: &AppState) -> Result<Vec<MostDiscussedInfo>> {
    Ok(queries::most_discussed(&state.db, 3)
        .await?
        .into_iter()
        .map(|r| MostDiscussedInfo {
            url: r.detail_path(),
            title: r.title,
            discussion_count: r.discussion_count,
        })
        .collect())
}

/// Review listing, newest updates first
pub async fn review_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    list_page(&state, &headers, None, query).await
}

/// Review listing restricted to a tag
pub async fn review_list_by_tag(
    State(state): State<Arc<AppState>>,
    Path(tag_slug): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let tag = queries::find_tag(&state.db, &tag_slug)
        .await?
        .ok_or(ServerError::TagNotFound(tag_slug))?;
    list_page(&state, &headers, Some(tag), query).await
}

async fn list_page(
    state: &AppState,
    headers: &HeaderMap,
    tag: Option<tag::Model>,
    query: ListQuery,
) -> Result<Response> {
    let select = match &tag {
        Some(t) => queries::published_with_tag(t.id),
        None => queries::published(),
    };

    let paginator = select.paginate(&state.db, queries::PAGE_SIZE);
    let last_page = paginator.num_pages().await?.max(1);
    // Out-of-range page numbers clamp to the last page rather than erroring
    let page = queries::parse_page(query.page.as_deref()).min(last_page);
    let reviews = paginator.fetch_page(page - 1).await?;

    let mut infos = Vec::with_capacity(reviews.len());
    for r in reviews {
        infos.push(review_info(state, r).await?);
    }

    let mut context = Context::new();
    context.insert("reviews", &infos);
    context.insert("page", &page);
    context.insert("num_pages", &last_page);
    context.insert("has_prev", &(page > 1));
    context.insert("has_next", &(page < last_page));
    context.insert("prev_page", &page.saturating_sub(1));
    context.insert("next_page", &(page + 1));
    if let Some(t) = &tag {
        context.insert(
            "tag",
            &TagInfo {
                name: t.name.clone(),
                slug: t.slug.clone(),
            },
        );
    }
    context.insert("most_discussed", &most_discussed_infos(state).await?);
    add_user_to_context(&mut context, state, headers).await;

    render_template("list.html", &context)
}

/// Review detail addressed by creation day and slug
pub async fn review_detail(
    State(state): State<Arc<AppState>>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Result<Response> {
    let (year, month, day) = match (year.parse(), month.parse(), day.parse()) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return Err(ServerError::ReviewNotFound),
    };

    let review = queries::find_published_by_day_slug(&state.db, year, month, day, &slug)
        .await?
        .ok_or(ServerError::ReviewNotFound)?;

    render_detail_page(&state, &headers, review, "", &[]).await
}

/// Render the detail page for a review: active discussions oldest first, a
/// discussion form, and the most-discussed sidebar. Also used to re-render
/// after a failed discussion submission, echoing the rejected body and its
/// field errors.
pub(crate) async fn render_detail_page(
    state: &AppState,
    headers: &HeaderMap,
    review: review::Model,
    form_body: &str,
    form_errors: &[String],
) -> Result<Response> {
    let current = get_current_user(state, headers).await;

    let discussions = queries::active_discussions(review.id).all(&state.db).await?;
    let mut discussion_infos = Vec::with_capacity(discussions.len());
    for d in discussions {
        let author = author_name(state, d.user_id).await?;
        discussion_infos.push(DiscussionInfo {
            id: d.id,
            author,
            body: d.body,
            created: format_relative_time(&d.created_on),
            is_owner: current.as_ref().map(|u| u.id) == Some(d.user_id),
        });
    }

    let info = review_info(state, review).await?;

    let mut context = Context::new();
    context.insert("review", &info);
    context.insert("discussions", &discussion_infos);
    context.insert("discussion_count", &discussion_infos.len());
    context.insert("form_body", form_body);
    context.insert("form_errors", form_errors);
    context.insert("most_discussed", &most_discussed_infos(state).await?);
    add_user_to_context(&mut context, state, headers).await;
    add_csrf_to_context(&mut context, headers);

    render_template("detail.html", &context)
}
