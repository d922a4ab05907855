//! Database connection management and repository implementations.

mod connections;
pub mod entity;
mod repositories;

pub use connections::{DatabaseConfig, connect};
pub use repositories::{
    PostgresCategoryRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

#[cfg(test)]
mod tests;
