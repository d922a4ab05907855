//! Tag handlers. Tags are read-only over the API; they are seeded and
//! attached to posts by id.

use actix_web::{HttpResponse, web};

use hygge_core::ports::TagRepository;
use hygge_shared::DataResponse;
use hygge_shared::dto::TagResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/tags - all tags with post counts.
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;

    let data: Vec<TagResponse> = tags.into_iter().map(TagResponse::from).collect();
    Ok(HttpResponse::Ok().json(DataResponse::new(data)))
}

/// GET /api/v1/tags/{slug}
pub async fn show(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let tag = state
        .tags
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(DataResponse::new(TagResponse::from(tag))))
}
