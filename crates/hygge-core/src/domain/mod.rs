//! Domain entities - the core business objects.

mod actor;
mod category;
mod post;
mod tag;
mod user;

pub use actor::{Actor, Role};
pub use category::Category;
pub use post::{Author, Post, PostStatus, apply_status_change};
pub use tag::Tag;
pub use user::User;
