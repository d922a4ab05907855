//! Error handling - translates service failures into HTTP responses.
//!
//! Bodies are `{ "message": ... }`, with a field -> messages map added
//! on validation failures.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use hygge_core::error::{DomainError, RepoError, ServiceError, ValidationErrors};
use hygge_core::ports::AuthError;
use hygge_shared::ErrorBody;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthenticated,
    Forbidden,
    Validation(ValidationErrors),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(message) => ErrorBody::new(message.clone()),
            AppError::Unauthenticated => ErrorBody::new("Unauthenticated."),
            AppError::Forbidden => ErrorBody::new("This action is unauthorized."),
            AppError::Validation(errors) => ErrorBody::validation(errors.clone()),
            AppError::Conflict(message) => ErrorBody::new(message.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody::new("Server error.")
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity } => AppError::NotFound(format!("{entity} not found")),
            DomainError::Unauthenticated => AppError::Unauthenticated,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Validation(errors) => AppError::Validation(errors),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(domain) => domain.into(),
            ServiceError::Repo(repo) => repo.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthenticated,
            AuthError::InsufficientPermissions => AppError::Forbidden,
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => {
                tracing::warn!("Auth error: {}", other);
                AppError::Unauthenticated
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_stable_status_codes() {
        let not_found: AppError = DomainError::not_found("post").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let unauthenticated: AppError = DomainError::Unauthenticated.into();
        assert_eq!(unauthenticated.status_code(), StatusCode::UNAUTHORIZED);

        let forbidden: AppError = DomainError::Forbidden.into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let validation: AppError =
            DomainError::Validation(ValidationErrors::single("title", "required")).into();
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn constraint_violations_surface_as_conflicts() {
        let conflict: AppError = RepoError::Constraint("duplicate slug".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let query: AppError = RepoError::Query("boom".to_string()).into();
        assert_eq!(query.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
