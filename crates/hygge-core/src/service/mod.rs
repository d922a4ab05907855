//! Service layer - orchestration of the core rules over the ports.

mod post;

pub use post::{CreatePost, PostService, UpdatePost};
