//! Category handlers.

use actix_web::{HttpResponse, web};

use hygge_core::error::ValidationErrors;
use hygge_core::ports::{CategoryRecord, CategoryRepository};
use hygge_core::slug::slugify;
use hygge_shared::dto::{CategoryResponse, StoreCategoryRequest, UpdateCategoryRequest};
use hygge_shared::{DataResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/categories - all categories with post counts.
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;

    let data: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(DataResponse::new(data)))
}

/// GET /api/v1/categories/{slug}
pub async fn show(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(DataResponse::new(CategoryResponse::from(category))))
}

/// POST /api/v1/categories
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<StoreCategoryRequest>,
) -> AppResult<HttpResponse> {
    require_content_role(&identity)?;
    let req = body.into_inner();

    let mut errors = ValidationErrors::new();
    validate_fields(&mut errors, &req.name, req.color.as_deref());

    // The slug is derived from the name, so a name collision surfaces
    // on the name field.
    let slug = slugify(&req.name);
    if state.categories.find_by_slug(&slug).await?.is_some() {
        errors.add("name", "The name has already been taken.");
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let category = state
        .categories
        .create(CategoryRecord {
            name: req.name,
            slug,
            description: req.description,
            color: req.color,
        })
        .await?;
    tracing::info!(category_id = category.id, "category created");

    Ok(HttpResponse::Created().json(DataResponse::new(CategoryResponse::from(category))))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    require_content_role(&identity)?;
    let id = path.into_inner();
    let req = body.into_inner();

    let current = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_string()))?;

    let name = req.name.unwrap_or_else(|| current.name.clone());
    let color = req.color.or_else(|| current.color.clone());

    let mut errors = ValidationErrors::new();
    validate_fields(&mut errors, &name, color.as_deref());

    // Renaming re-derives the slug; a collision with another category
    // is rejected.
    let slug = slugify(&name);
    if slug != current.slug {
        if let Some(other) = state.categories.find_by_slug(&slug).await? {
            if other.id != current.id {
                errors.add("name", "The name has already been taken.");
            }
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let category = state
        .categories
        .update(
            id,
            CategoryRecord {
                name,
                slug,
                description: req.description.or(current.description),
                color,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(CategoryResponse::from(category))))
}

/// DELETE /api/v1/categories/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    require_content_role(&identity)?;
    let id = path.into_inner();

    state.categories.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted successfully.")))
}

/// Category management is open to writers and admins.
fn require_content_role(identity: &Identity) -> Result<(), AppError> {
    if identity.has_role("admin") || identity.has_role("writer") {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn validate_fields(errors: &mut ValidationErrors, name: &str, color: Option<&str>) {
    if name.trim().is_empty() {
        errors.add("name", "The name field is required.");
    } else if name.chars().count() > 255 {
        errors.add("name", "The name may not be greater than 255 characters.");
    }
    if let Some(color) = color {
        if color.chars().count() > 7 {
            errors.add("color", "The color may not be greater than 7 characters.");
        }
    }
}
