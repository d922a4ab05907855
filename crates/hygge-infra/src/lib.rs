//! # Hygge Infrastructure
//!
//! Concrete implementations of the ports defined in `hygge-core`:
//! SeaORM/PostgreSQL repositories, JWT token issuance, and Argon2
//! password hashing.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, PasswordConfig};
pub use database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository, connect,
};
