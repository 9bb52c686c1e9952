//! Database entities

pub mod discussion;
pub mod review;
pub mod review_tag;
pub mod tag;
pub mod user;

pub use discussion::Entity as Discussion;
pub use review::Entity as Review;
pub use review_tag::Entity as ReviewTag;
pub use tag::Entity as Tag;
pub use user::Entity as User;
