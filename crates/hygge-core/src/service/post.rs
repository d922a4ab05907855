//! Post orchestration: the check ordering and defaulting rules around
//! the pure policy, slug and publish-transition pieces.
//!
//! Ordering is load-bearing: existence is checked before authorization
//! (a missing post is `NotFound` even to an anonymous caller), and
//! validation runs to completion before anything is persisted (a
//! rejected write leaves the record untouched).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Actor, Post, PostStatus, apply_status_change};
use crate::error::{DomainError, ServiceError, ValidationErrors};
use crate::policy::{self, Decision, PostAction};
use crate::ports::{CategoryRepository, Page, PostRecord, PostRepository, TagRepository};
use crate::slug::assign_slug;

const MAX_PER_PAGE: u64 = 100;
const DEFAULT_PER_PAGE: u64 = 15;

/// Payload for creating a post. `status` arrives as the raw wire string
/// and is validated here so a bad value lands in the field-error map.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub status: String,
    pub featured_image: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update payload; absent fields are left untouched. The
/// nullable fields are doubled `Option`s: the outer level is
/// presence, the inner level is the new value, so `Some(None)` clears
/// a stored value while `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub featured_image: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
    pub tags: Option<Vec<i64>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Post use cases over the persistence ports.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
        }
    }

    /// Public listing: published posts only, optionally filtered by
    /// category slug. An unknown category slug falls back to the
    /// unfiltered published listing.
    pub async fn list_published(
        &self,
        category_slug: Option<&str>,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<Page<Post>, ServiceError> {
        let (page, per_page) = clamp_paging(page, per_page);

        let category_id = match category_slug {
            Some(slug) => self.categories.find_by_slug(slug).await?.map(|c| c.id),
            None => None,
        };

        Ok(self
            .posts
            .list_published(category_id, page, per_page)
            .await?)
    }

    /// Admin listing: every non-deleted post regardless of status.
    /// Requires a content role (writer or admin).
    pub async fn list_all(
        &self,
        actor: Option<&Actor>,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<Page<Post>, ServiceError> {
        if policy::evaluate(actor, PostAction::Create) == Decision::Deny {
            return Err(deny(actor).into());
        }
        let (page, per_page) = clamp_paging(page, per_page);
        Ok(self.posts.list_all(page, per_page).await?)
    }

    /// Single-post fetch by slug. Existence first, then visibility; a
    /// public read of a published post bumps the view counter.
    pub async fn show(&self, actor: Option<&Actor>, slug: &str) -> Result<Post, ServiceError> {
        let mut post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if post.is_published() {
            self.posts.increment_views(post.id).await?;
            post.views_count += 1;
        } else if policy::evaluate(actor, PostAction::View(&post)) == Decision::Deny {
            // The draft's existence is revealed, its contents are not.
            return Err(DomainError::Forbidden.into());
        }

        Ok(post)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Post>, ServiceError> {
        Ok(self.posts.find_by_id(id).await?)
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: CreatePost,
    ) -> Result<Post, ServiceError> {
        if policy::evaluate(actor, PostAction::Create) == Decision::Deny {
            return Err(deny(actor).into());
        }
        let actor = actor.expect("create gate guarantees an actor");

        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &input.title, 255);
        require(&mut errors, "excerpt", &input.excerpt, 500);
        if input.content.trim().is_empty() {
            errors.add("content", "The content field is required.");
        }
        let status = parse_status(&mut errors, &input.status);
        if let Some(image) = &input.featured_image {
            check_len(&mut errors, "featured_image", image, 255);
        }

        let slug = assign_slug(&input.title, input.slug.as_deref());
        check_len(&mut errors, "slug", &slug, 255);
        if self.posts.find_by_slug(&slug).await?.is_some() {
            errors.add("slug", "The slug has already been taken.");
        }

        self.check_category(&mut errors, input.category_id).await?;
        self.check_tags(&mut errors, input.tags.as_deref()).await?;

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }
        let status = status.expect("status validated above");

        // Create-path publish defaulting: the first transition into
        // `published` with nothing supplied stamps now().
        let published_at = match (status, input.published_at) {
            (PostStatus::Published, None) => Some(Utc::now()),
            (_, supplied) => supplied,
        };

        let record = PostRecord {
            title: input.title,
            slug,
            excerpt: input.excerpt,
            content: input.content,
            status,
            featured_image: input.featured_image,
            author_id: actor.id,
            category_id: input.category_id,
            published_at,
        };

        let tag_ids = input.tags.unwrap_or_default();
        let post = self.posts.create(record, &tag_ids).await?;
        tracing::info!(post_id = post.id, slug = %post.slug, "post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: i64,
        input: UpdatePost,
    ) -> Result<Post, ServiceError> {
        let current = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if policy::evaluate(actor, PostAction::Update(&current)) == Decision::Deny {
            return Err(deny(actor).into());
        }

        let mut errors = ValidationErrors::new();
        if let Some(title) = &input.title {
            require(&mut errors, "title", title, 255);
        }
        if let Some(excerpt) = &input.excerpt {
            require(&mut errors, "excerpt", excerpt, 500);
        }
        if let Some(content) = &input.content {
            if content.trim().is_empty() {
                errors.add("content", "The content field is required.");
            }
        }
        let new_status = match &input.status {
            Some(raw) => parse_status(&mut errors, raw),
            None => None,
        };
        if let Some(Some(image)) = &input.featured_image {
            check_len(&mut errors, "featured_image", image, 255);
        }

        // Slug derivation is update-path opt-in: a payload carrying a
        // title but no slug derives a fresh one; otherwise the stored
        // slug stands unless explicitly replaced.
        let slug = match (&input.slug, &input.title) {
            (Some(slug), _) if !slug.trim().is_empty() => slug.clone(),
            (_, Some(title)) => assign_slug(title, None),
            _ => current.slug.clone(),
        };
        check_len(&mut errors, "slug", &slug, 255);
        if slug != current.slug {
            if let Some(other) = self.posts.find_by_slug(&slug).await? {
                if other.id != current.id {
                    errors.add("slug", "The slug has already been taken.");
                }
            }
        }

        if let Some(Some(category_id)) = input.category_id {
            self.check_category(&mut errors, Some(category_id)).await?;
        }
        self.check_tags(&mut errors, input.tags.as_deref()).await?;

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }

        let mut merged = current.clone();
        if let Some(title) = input.title {
            merged.title = title;
        }
        merged.slug = slug;
        if let Some(excerpt) = input.excerpt {
            merged.excerpt = excerpt;
        }
        if let Some(content) = input.content {
            merged.content = content;
        }
        if let Some(image) = input.featured_image {
            merged.featured_image = image;
        }
        if let Some(category_id) = input.category_id {
            merged.category_id = category_id;
        }

        match new_status {
            Some(status) => apply_status_change(&mut merged, status, input.published_at),
            None => {
                if let Some(supplied) = input.published_at {
                    merged.published_at = Some(supplied);
                }
            }
        }

        let record = PostRecord {
            title: merged.title,
            slug: merged.slug,
            excerpt: merged.excerpt,
            content: merged.content,
            status: merged.status,
            featured_image: merged.featured_image,
            author_id: current.author_id,
            category_id: merged.category_id,
            published_at: merged.published_at,
        };

        let post = self
            .posts
            .update(id, record, input.tags.as_deref())
            .await?;
        tracing::info!(post_id = post.id, "post updated");
        Ok(post)
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: i64) -> Result<(), ServiceError> {
        let current = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if policy::evaluate(actor, PostAction::Delete(&current)) == Decision::Deny {
            return Err(deny(actor).into());
        }

        self.posts.soft_delete(id).await?;
        tracing::info!(post_id = id, "post soft-deleted");
        Ok(())
    }

    async fn check_category(
        &self,
        errors: &mut ValidationErrors,
        category_id: Option<i64>,
    ) -> Result<(), ServiceError> {
        if let Some(id) = category_id {
            if !self.categories.exists(id).await? {
                errors.add("category_id", "The selected category_id is invalid.");
            }
        }
        Ok(())
    }

    async fn check_tags(
        &self,
        errors: &mut ValidationErrors,
        tags: Option<&[i64]>,
    ) -> Result<(), ServiceError> {
        if let Some(ids) = tags {
            if !ids.is_empty() {
                for missing in self.tags.missing_ids(ids).await? {
                    errors.add("tags", format!("Tag {missing} does not exist."));
                }
            }
        }
        Ok(())
    }
}

/// Mutation denials distinguish a missing actor from the wrong actor.
fn deny(actor: Option<&Actor>) -> DomainError {
    if actor.is_none() {
        DomainError::Unauthenticated
    } else {
        DomainError::Forbidden
    }
}

fn clamp_paging(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

fn require(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {field} field is required."));
    } else {
        check_len(errors, field, value, max);
    }
}

fn check_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {field} may not be greater than {max} characters."),
        );
    }
}

fn parse_status(errors: &mut ValidationErrors, raw: &str) -> Option<PostStatus> {
    match raw.parse() {
        Ok(status) => Some(status),
        Err(()) => {
            errors.add("status", "The selected status is invalid.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Role, Tag};
    use crate::error::RepoError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory post store mirroring the repository contract: slugs are
    /// looked up among non-deleted rows only, ids are assigned serially.
    #[derive(Default)]
    struct MemoryPosts {
        rows: Mutex<Vec<Post>>,
    }

    impl MemoryPosts {
        fn get(&self, id: i64) -> Option<Post> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id && p.deleted_at.is_none())
                .cloned()
        }
    }

    #[async_trait]
    impl PostRepository for MemoryPosts {
        async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
            Ok(self.get(id))
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.slug == slug && p.deleted_at.is_none())
                .cloned())
        }

        async fn list_published(
            &self,
            category_id: Option<i64>,
            page: u64,
            per_page: u64,
        ) -> Result<Page<Post>, RepoError> {
            let now = Utc::now();
            let items: Vec<Post> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| {
                    p.deleted_at.is_none()
                        && p.status == PostStatus::Published
                        && p.published_at.is_some_and(|ts| ts <= now)
                        && category_id.is_none_or(|id| p.category_id == Some(id))
                })
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(Page {
                items,
                total,
                page,
                per_page,
            })
        }

        async fn list_all(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
            let items: Vec<Post> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.deleted_at.is_none())
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(Page {
                items,
                total,
                page,
                per_page,
            })
        }

        async fn create(&self, record: PostRecord, _tag_ids: &[i64]) -> Result<Post, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let now = Utc::now();
            let post = Post {
                id: rows.len() as i64 + 1,
                title: record.title,
                slug: record.slug,
                excerpt: record.excerpt,
                content: record.content,
                status: record.status,
                featured_image: record.featured_image,
                author_id: record.author_id,
                category_id: record.category_id,
                views_count: 0,
                published_at: record.published_at,
                created_at: now,
                updated_at: now,
                deleted_at: None,
                author: None,
                category: None,
                tags: Vec::new(),
            };
            rows.push(post.clone());
            Ok(post)
        }

        async fn update(
            &self,
            id: i64,
            record: PostRecord,
            _tag_ids: Option<&[i64]>,
        ) -> Result<Post, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let post = rows
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepoError::NotFound)?;
            post.title = record.title;
            post.slug = record.slug;
            post.excerpt = record.excerpt;
            post.content = record.content;
            post.status = record.status;
            post.featured_image = record.featured_image;
            post.category_id = record.category_id;
            post.published_at = record.published_at;
            post.updated_at = Utc::now();
            Ok(post.clone())
        }

        async fn soft_delete(&self, id: i64) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let post = rows
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepoError::NotFound)?;
            post.deleted_at = Some(Utc::now());
            Ok(())
        }

        async fn increment_views(&self, id: i64) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let post = rows
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepoError::NotFound)?;
            post.views_count += 1;
            Ok(())
        }
    }

    struct MemoryCategories;

    #[async_trait]
    impl CategoryRepository for MemoryCategories {
        async fn list(&self) -> Result<Vec<Category>, RepoError> {
            Ok(Vec::new())
        }
        async fn find_by_id(&self, _id: i64) -> Result<Option<Category>, RepoError> {
            Ok(None)
        }
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
            Ok((slug == "hygge").then(|| Category {
                id: 1,
                name: "Hygge".to_string(),
                slug: "hygge".to_string(),
                description: None,
                color: None,
                posts_count: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        }
        async fn exists(&self, id: i64) -> Result<bool, RepoError> {
            Ok(id == 1)
        }
        async fn create(
            &self,
            _record: crate::ports::CategoryRecord,
        ) -> Result<Category, RepoError> {
            Err(RepoError::Query("unsupported".into()))
        }
        async fn update(
            &self,
            _id: i64,
            _record: crate::ports::CategoryRecord,
        ) -> Result<Category, RepoError> {
            Err(RepoError::Query("unsupported".into()))
        }
        async fn delete(&self, _id: i64) -> Result<(), RepoError> {
            Ok(())
        }
    }

    struct MemoryTags;

    #[async_trait]
    impl TagRepository for MemoryTags {
        async fn list(&self) -> Result<Vec<Tag>, RepoError> {
            Ok(Vec::new())
        }
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Tag>, RepoError> {
            Ok(None)
        }
        async fn missing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, RepoError> {
            Ok(ids.iter().copied().filter(|id| *id > 10).collect())
        }
    }

    fn service() -> PostService {
        PostService::new(
            Arc::new(MemoryPosts::default()),
            Arc::new(MemoryCategories),
            Arc::new(MemoryTags),
        )
    }

    fn writer(id: i64) -> Actor {
        Actor::new(id, [Role::Writer])
    }

    fn admin(id: i64) -> Actor {
        Actor::new(id, [Role::Admin])
    }

    fn draft_input(title: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            slug: None,
            excerpt: "An excerpt.".to_string(),
            content: "The full content.".to_string(),
            status: "draft".to_string(),
            featured_image: None,
            category_id: None,
            tags: None,
            published_at: None,
        }
    }

    fn assert_validation_on(err: ServiceError, field: &str) {
        match err {
            ServiceError::Domain(DomainError::Validation(errors)) => {
                assert!(
                    errors.0.contains_key(field),
                    "expected a {field} error, got {errors:?}"
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_published_defaults_published_at_within_window() {
        let service = service();
        let before = Utc::now();

        let mut input = draft_input("Why Slower Mornings Matter");
        input.status = "published".to_string();
        let post = service.create(Some(&writer(1)), input).await.unwrap();
        let after = Utc::now();

        assert_eq!(post.slug, "why-slower-mornings-matter");
        let ts = post.published_at.expect("published_at set");
        assert!(ts >= before && ts <= after);

        // Reading it back yields the same timestamp.
        let fetched = service.show(None, &post.slug).await.unwrap();
        assert_eq!(fetched.published_at, post.published_at);
    }

    #[tokio::test]
    async fn duplicate_derived_slug_is_a_validation_failure() {
        let service = service();
        let writer = writer(1);

        service
            .create(Some(&writer), draft_input("Hello World"))
            .await
            .unwrap();

        let err = service
            .create(Some(&writer), draft_input("Hello World"))
            .await
            .unwrap_err();
        assert_validation_on(err, "slug");

        // A distinct explicit slug resolves the collision.
        let mut input = draft_input("Hello World");
        input.slug = Some("hello-world-again".to_string());
        let post = service.create(Some(&writer), input).await.unwrap();
        assert_eq!(post.slug, "hello-world-again");
    }

    #[tokio::test]
    async fn create_requires_a_content_role() {
        let service = service();

        let err = service
            .create(None, draft_input("Anonymous Post"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Unauthenticated)
        ));

        let roleless = Actor::new(9, []);
        let err = service
            .create(Some(&roleless), draft_input("Roleless Post"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_category_and_tags() {
        let service = service();
        let mut input = draft_input("Taxonomy Check");
        input.category_id = Some(42);
        input.tags = Some(vec![1, 99]);

        let err = service.create(Some(&writer(1)), input).await.unwrap_err();
        match err {
            ServiceError::Domain(DomainError::Validation(errors)) => {
                assert!(errors.0.contains_key("category_id"));
                assert!(errors.0.contains_key("tags"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_of_missing_post_is_not_found_before_authorization() {
        let service = service();
        let err = service.delete(None, 9999).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn deleted_post_leaves_normal_queries() {
        let service = service();
        let writer = writer(1);
        let post = service
            .create(Some(&writer), draft_input("Soon Gone"))
            .await
            .unwrap();

        service.delete(Some(&writer), post.id).await.unwrap();

        let err = service.show(Some(&writer), &post.slug).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));

        // The freed slug may be taken by a new post.
        let replacement = service
            .create(Some(&writer), draft_input("Soon Gone"))
            .await
            .unwrap();
        assert_eq!(replacement.slug, "soon-gone");
    }

    #[tokio::test]
    async fn cross_writer_update_and_delete_are_forbidden() {
        let service = service();
        let author = writer(1);
        let other = writer(2);
        let post = service
            .create(Some(&author), draft_input("Mine Alone"))
            .await
            .unwrap();

        let err = service
            .update(Some(&other), post.id, UpdatePost::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden)));

        let err = service.delete(Some(&other), post.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden)));

        // Admin may do both regardless of authorship.
        service
            .update(
                Some(&admin(3)),
                post.id,
                UpdatePost {
                    title: Some("Ours Now".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service.delete(Some(&admin(3)), post.id).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_update_leaves_the_record_unchanged() {
        let service = service();
        let writer = writer(1);
        let post = service
            .create(Some(&writer), draft_input("Stable Under Failure"))
            .await
            .unwrap();

        let err = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    title: Some(String::new()),
                    status: Some("pending".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        match err {
            ServiceError::Domain(DomainError::Validation(errors)) => {
                assert!(errors.0.contains_key("title"));
                assert!(errors.0.contains_key("status"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }

        let stored = service.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Stable Under Failure");
        assert_eq!(stored.status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn update_derives_slug_only_when_title_present_and_slug_omitted() {
        let service = service();
        let writer = writer(1);
        let post = service
            .create(Some(&writer), draft_input("Original Title"))
            .await
            .unwrap();
        assert_eq!(post.slug, "original-title");

        // Title with no slug: derivation kicks in.
        let updated = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    title: Some("Renamed Title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "renamed-title");

        // Explicit slug wins over derivation.
        let updated = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    title: Some("Renamed Again".to_string()),
                    slug: Some("kept-slug".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "kept-slug");

        // No title, no slug: stored slug stands.
        let updated = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    excerpt: Some("Fresh excerpt.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "kept-slug");
    }

    #[tokio::test]
    async fn republish_through_update_keeps_original_published_at() {
        let service = service();
        let writer = writer(1);
        let mut input = draft_input("Publish Cycle");
        input.status = "published".to_string();
        let post = service.create(Some(&writer), input).await.unwrap();
        let first = post.published_at;

        let unpublished = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    status: Some("draft".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unpublished.published_at, first);

        let republished = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    status: Some("published".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(republished.published_at, first);
    }

    #[tokio::test]
    async fn public_show_of_published_post_increments_views_each_read() {
        let service = service();
        let mut input = draft_input("Counted");
        input.status = "published".to_string();
        let post = service.create(Some(&writer(1)), input).await.unwrap();

        let first = service.show(None, &post.slug).await.unwrap();
        assert_eq!(first.views_count, 1);
        let second = service.show(None, &post.slug).await.unwrap();
        assert_eq!(second.views_count, 2);
    }

    #[tokio::test]
    async fn draft_show_is_forbidden_to_outsiders_but_not_hidden() {
        let service = service();
        let author = writer(1);
        let post = service
            .create(Some(&author), draft_input("Quiet Draft"))
            .await
            .unwrap();

        // Existing draft: forbidden, not "not found".
        let err = service.show(None, &post.slug).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Forbidden)));

        // Draft reads never bump the counter.
        let seen = service.show(Some(&author), &post.slug).await.unwrap();
        assert_eq!(seen.views_count, 0);

        // Unknown slug stays "not found".
        let err = service.show(None, "nothing-here").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn admin_listing_is_gated_and_includes_drafts() {
        let service = service();
        let writer = writer(1);
        service
            .create(Some(&writer), draft_input("Hidden Draft"))
            .await
            .unwrap();

        let err = service.list_all(None, None, None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Unauthenticated)
        ));

        let page = service
            .list_all(Some(&writer), None, None)
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let public = service.list_published(None, None, None).await.unwrap();
        assert_eq!(public.total, 0);
    }

    #[tokio::test]
    async fn unknown_category_filter_falls_back_to_the_unfiltered_listing() {
        let service = service();
        let writer = writer(1);

        let mut categorized = draft_input("In The Hygge Category");
        categorized.status = "published".to_string();
        categorized.category_id = Some(1);
        service.create(Some(&writer), categorized).await.unwrap();

        let mut uncategorized = draft_input("No Category At All");
        uncategorized.status = "published".to_string();
        service.create(Some(&writer), uncategorized).await.unwrap();

        // A known slug narrows the listing to that category.
        let filtered = service
            .list_published(Some("hygge"), None, None)
            .await
            .unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.items[0].slug, "in-the-hygge-category");

        // An unknown slug resolves to no category and the full
        // published listing comes back.
        let fallback = service
            .list_published(Some("solstice"), None, None)
            .await
            .unwrap();
        assert_eq!(fallback.total, 2);
    }

    #[tokio::test]
    async fn nullable_fields_distinguish_absent_from_explicit_null() {
        let service = service();
        let writer = writer(1);

        let mut input = draft_input("Decorated Post");
        input.featured_image = Some("cozy.jpg".to_string());
        input.category_id = Some(1);
        let post = service.create(Some(&writer), input).await.unwrap();

        // Absent fields leave the stored values alone.
        let untouched = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    excerpt: Some("New excerpt.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.featured_image.as_deref(), Some("cozy.jpg"));
        assert_eq!(untouched.category_id, Some(1));

        // Explicit nulls clear them.
        let cleared = service
            .update(
                Some(&writer),
                post.id,
                UpdatePost {
                    featured_image: Some(None),
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.featured_image, None);
        assert_eq!(cleared.category_id, None);
    }

    #[tokio::test]
    async fn per_page_is_clamped_to_the_allowed_range() {
        let service = service();
        let page = service
            .list_published(None, Some(0), Some(1000))
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }
}
