//! Application state - shared across all handlers.

use std::sync::Arc;

use hygge_core::ports::{
    CategoryRepository, PasswordService, PostRepository, TagRepository, TokenService,
    UserRepository,
};
use hygge_core::service::PostService;
use hygge_infra::database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository, connect,
};
use hygge_infra::{Argon2PasswordService, JwtTokenService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Connect to the database and wire the repositories into the
    /// service layer.
    pub async fn new(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = connect(config).await?;

        let post_repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(db.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
        let categories: Arc<dyn CategoryRepository> =
            Arc::new(PostgresCategoryRepository::new(db.clone()));
        let tags: Arc<dyn TagRepository> = Arc::new(PostgresTagRepository::new(db));

        let posts = Arc::new(PostService::new(
            post_repo,
            categories.clone(),
            tags.clone(),
        ));

        tracing::info!("Application state initialized");

        Ok(Self {
            posts,
            users,
            categories,
            tags,
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::from_env()),
        })
    }
}
