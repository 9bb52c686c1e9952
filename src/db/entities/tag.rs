//! Tag entity: a free-form label attached to reviews.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review_tag::Entity")]
    ReviewTags,
}

impl Related<super::review_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewTags.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        super::review_tag::Relation::Review.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::review_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
