//! Domain-level error types.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> list of human-readable messages, collected before any write.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-field constructor for the common one-error case.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

/// Domain errors - business rule failures.
///
/// All four kinds are terminal for the current operation: no retry, no
/// partial application. `NotFound` is always checked before authorization,
/// so a denied action on an existing record surfaces as `Forbidden`
/// (or `Unauthenticated` when no actor is present at all).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("action requires authentication")]
    Unauthenticated,

    #[error("actor lacks the role or ownership required for this action")]
    Forbidden,

    #[error("validation failed")]
    Validation(ValidationErrors),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        DomainError::NotFound { entity }
    }
}

/// Error surface of the service layer: a business-rule failure or a
/// persistence failure, kept distinct so the boundary can translate each.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_group_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "The title field is required.");
        errors.add("slug", "The slug has already been taken.");
        errors.add("slug", "The slug may not be greater than 255 characters.");

        assert_eq!(errors.0.get("title").map(Vec::len), Some(1));
        assert_eq!(errors.0.get("slug").map(Vec::len), Some(2));
        assert!(!errors.is_empty());
    }
}
