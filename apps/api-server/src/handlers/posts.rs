//! Post handlers.

use actix_web::{HttpResponse, web};

use hygge_core::service::{CreatePost, UpdatePost};
use hygge_shared::dto::{PostListQuery, PostResponse, StorePostRequest, UpdatePostRequest};
use hygge_shared::{DataResponse, MessageResponse, PagedResponse};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/posts - public listing of published posts.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let page = state
        .posts
        .list_published(query.category.as_deref(), query.page, query.per_page)
        .await?;

    Ok(HttpResponse::Ok().json(PagedResponse::from_page(page, |post| {
        PostResponse::from_post(post, false)
    })))
}

/// GET /api/v1/admin/posts - every post regardless of status.
pub async fn admin_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let actor = identity.actor();

    let page = state
        .posts
        .list_all(Some(&actor), query.page, query.per_page)
        .await?;

    Ok(HttpResponse::Ok().json(PagedResponse::from_page(page, |post| {
        PostResponse::from_post(post, true)
    })))
}

/// GET /api/v1/posts/{slug} - single post, with content.
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let actor = identity.0.map(|i| i.actor());

    let post = state.posts.show(actor.as_ref(), &slug).await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(PostResponse::from_post(post, true))))
}

/// POST /api/v1/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<StorePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let actor = identity.actor();

    let input = CreatePost {
        title: req.title,
        slug: req.slug,
        excerpt: req.excerpt,
        content: req.content,
        status: req.status,
        featured_image: req.featured_image,
        category_id: req.category_id,
        tags: req.tags,
        published_at: req.published_at,
    };

    let post = state.posts.create(Some(&actor), input).await?;

    Ok(HttpResponse::Created().json(DataResponse::new(PostResponse::from_post(post, true))))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let actor = identity.actor();

    let input = UpdatePost {
        title: req.title,
        slug: req.slug,
        excerpt: req.excerpt,
        content: req.content,
        status: req.status,
        featured_image: req.featured_image,
        category_id: req.category_id,
        tags: req.tags,
        published_at: req.published_at,
    };

    let post = state.posts.update(Some(&actor), id, input).await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(PostResponse::from_post(post, true))))
}

/// DELETE /api/v1/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let actor = identity.actor();

    state.posts.delete(Some(&actor), id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully.")))
}
