use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use hygge_core::domain::{Post, PostStatus};
use hygge_core::error::RepoError;
use hygge_core::ports::PostRepository;

use super::entity::post;
use super::repositories::PostgresPostRepository;

fn post_model(id: i64, status: &str) -> post::Model {
    let now = Utc::now().fixed_offset();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        excerpt: "Excerpt".to_owned(),
        content: "Content".to_owned(),
        status: status.to_owned(),
        featured_image: None,
        author_id: 1,
        category_id: None,
        views_count: 3,
        published_at: Some(now),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

#[test]
fn model_maps_to_domain_post() {
    let model = post_model(5, "published");
    let domain: Post = model.into();

    assert_eq!(domain.id, 5);
    assert_eq!(domain.status, PostStatus::Published);
    assert_eq!(domain.views_count, 3);
    assert!(domain.published_at.is_some());
    assert!(domain.tags.is_empty());
}

#[test]
fn unknown_stored_status_falls_back_to_draft() {
    let model = post_model(6, "pending-review");
    let domain: Post = model.into();
    assert_eq!(domain.status, PostStatus::Draft);
}

#[tokio::test]
async fn soft_delete_of_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.soft_delete(9999).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn soft_delete_stamps_an_existing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.soft_delete(1).await.is_ok());
}

#[tokio::test]
async fn increment_views_is_a_single_update() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.increment_views(1).await.is_ok());
}
