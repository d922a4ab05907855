//! # Hygge Shared
//!
//! Wire types shared between the API server and its clients:
//! request payloads, response shapes, and the `{ "data": ... }` envelope.

pub mod dto;
pub mod response;

pub use response::{DataResponse, ErrorBody, MessageResponse, PageMeta, PagedResponse};
