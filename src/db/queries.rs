//! Named query entry points over the review collection.
//!
//! Two retrieval strategies exist: [`all`] returns every record and backs the
//! admin tooling, while [`published`] is the only view the public workflows
//! ever see. Draft reviews are unreachable through anything built on
//! [`published`].

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use super::entities::review::ReviewStatus;
use super::entities::{discussion, review, review_tag, tag};

/// Reviews shown per listing page.
pub const PAGE_SIZE: u64 = 3;

/// Every review, most recently updated first.
pub fn all() -> Select<review::Entity> {
    review::Entity::find().order_by_desc(review::Column::UpdatedOn)
}

/// Published reviews only, most recently updated first.
pub fn published() -> Select<review::Entity> {
    all().filter(review::Column::Status.eq(ReviewStatus::Published))
}

/// Published reviews carrying the given tag.
pub fn published_with_tag(tag_id: i32) -> Select<review::Entity> {
    published()
        .join(JoinType::InnerJoin, review_tag::Relation::Review.def().rev())
        .filter(review_tag::Column::TagId.eq(tag_id))
}

/// Active discussions under a review, oldest first.
pub fn active_discussions(review_id: i32) -> Select<discussion::Entity> {
    discussion::Entity::find()
        .filter(discussion::Column::ReviewId.eq(review_id))
        .filter(discussion::Column::IsActive.eq(true))
        .order_by_asc(discussion::Column::CreatedOn)
}

/// A published review projected together with its total discussion count.
/// Inactive discussions count too; moderation hides them from display only.
#[derive(Debug, FromQueryResult)]
pub struct DiscussedReview {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub created_on: sea_orm::prelude::DateTimeUtc,
    pub discussion_count: i64,
}

impl DiscussedReview {
    pub fn detail_path(&self) -> String {
        review::detail_path(&self.created_on, &self.slug)
    }
}

/// Published reviews ranked by descending discussion count.
pub async fn most_discussed(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<DiscussedReview>, DbErr> {
    review::Entity::find()
        .filter(review::Column::Status.eq(ReviewStatus::Published))
        .join(JoinType::LeftJoin, review::Relation::Discussions.def())
        .select_only()
        .columns([
            review::Column::Id,
            review::Column::Title,
            review::Column::Slug,
            review::Column::CreatedOn,
        ])
        .column_as(discussion::Column::Id.count(), "discussion_count")
        .group_by(review::Column::Id)
        .order_by_desc(SimpleExpr::from(Expr::col(Alias::new("discussion_count"))))
        .limit(limit)
        .into_model::<DiscussedReview>()
        .all(db)
        .await
}

/// Natural-key detail lookup: creation day plus slug, published only.
pub async fn find_published_by_day_slug(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
    day: u32,
    slug: &str,
) -> Result<Option<review::Model>, DbErr> {
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return Ok(None);
    };
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = start + Duration::days(1);

    review::Entity::find()
        .filter(review::Column::Status.eq(ReviewStatus::Published))
        .filter(review::Column::Slug.eq(slug))
        .filter(review::Column::CreatedOn.gte(start))
        .filter(review::Column::CreatedOn.lt(end))
        .one(db)
        .await
}

/// Published review by id, for workflows addressed by record id.
pub async fn find_published_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<review::Model>, DbErr> {
    review::Entity::find_by_id(id)
        .filter(review::Column::Status.eq(ReviewStatus::Published))
        .one(db)
        .await
}

/// Tag lookup by slug.
pub async fn find_tag(db: &DatabaseConnection, slug: &str) -> Result<Option<tag::Model>, DbErr> {
    tag::Entity::find()
        .filter(tag::Column::Slug.eq(slug))
        .one(db)
        .await
}

/// Parse a raw `?page=` value. Anything that is not a positive integer
/// falls back to the first page; clamping to the last page happens at the
/// call site once the page count is known.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}
