//! Review entity: a draft or published article.

use chrono::Datelike;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum ReviewStatus {
    #[sea_orm(string_value = "DF")]
    #[default]
    Draft,
    #[sea_orm(string_value = "PB")]
    Published,
}

impl ReviewStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "Draft",
            ReviewStatus::Published => "Published",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Unique per calendar day of `created_on`, not globally.
    pub slug: String,
    pub author_id: i32,
    pub body: String,
    pub status: ReviewStatus,
    pub created_on: DateTimeUtc,
    pub updated_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::discussion::Entity")]
    Discussions,
    #[sea_orm(has_many = "super::review_tag::Entity")]
    ReviewTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::discussion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discussions.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::review_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::review_tag::Relation::Review.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical detail URL for a review created on `created_on` with `slug`.
pub fn detail_path(created_on: &DateTimeUtc, slug: &str) -> String {
    format!(
        "/{}/{:02}/{:02}/{}",
        created_on.year(),
        created_on.month(),
        created_on.day(),
        slug
    )
}

impl Model {
    pub fn detail_path(&self) -> String {
        detail_path(&self.created_on, &self.slug)
    }
}
