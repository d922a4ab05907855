//! # Hygge Core
//!
//! The domain layer of the HyggeStack blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the post visibility/authorization policy, publish-transition rules,
//! slug assignment, and the ports that infrastructure implements.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;
pub mod slug;

pub use error::DomainError;
