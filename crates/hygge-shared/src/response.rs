//! Standardized API response shapes.
//!
//! Success bodies wrap their payload in `{ "data": ... }`; listings add a
//! `meta` block with the paginator fields. Errors carry a message and,
//! for validation failures, a field -> messages map.

use serde::{Deserialize, Serialize};

use hygge_core::error::ValidationErrors;
use hygge_core::ports::Page;

/// `{ "data": ... }` envelope for single resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginator metadata accompanying a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

/// `{ "data": [...], "meta": {...} }` envelope for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PagedResponse<T> {
    /// Map a domain page into the wire shape.
    pub fn from_page<S>(page: Page<S>, map: impl Fn(S) -> T) -> Self {
        let meta = PageMeta {
            current_page: page.page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page(),
        };
        Self {
            data: page.items.into_iter().map(map).collect(),
            meta,
        }
    }
}

/// Plain `{ "message": ... }` body for operations with no resource to
/// return (delete, logout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body: a stable message, plus the field map on 422s.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            message: "The given data was invalid.".to_string(),
            errors: Some(errors),
        }
    }
}
