//! SeaORM entities mirroring the blog schema.

pub mod category;
pub mod post;
pub mod post_tag;
pub mod role;
pub mod tag;
pub mod user;
pub mod user_role;
