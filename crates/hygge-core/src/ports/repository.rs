use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Category, Post, PostStatus, Role, Tag, User};
use crate::error::RepoError;

/// One page of a listing, with enough metadata for the paginator block
/// in the response.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }
}

/// The writable post fields handed to the repository. Identity,
/// `views_count` and the soft-delete marker are owned by the store;
/// `author_id` is written once at creation and never updated.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Post persistence. Every query excludes soft-deleted rows, and every
/// returned post carries its eager-loaded author, category and tags.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Published posts (`published_at <= now`), newest publication first,
    /// optionally filtered to one category.
    async fn list_published(
        &self,
        category_id: Option<i64>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError>;

    /// Every non-deleted post regardless of status, newest first.
    async fn list_all(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError>;

    async fn create(&self, record: PostRecord, tag_ids: &[i64]) -> Result<Post, RepoError>;

    /// Full-record update; `tag_ids` of `None` leaves the tag set alone.
    async fn update(
        &self,
        id: i64,
        record: PostRecord,
        tag_ids: Option<&[i64]>,
    ) -> Result<Post, RepoError>;

    /// Stamp `deleted_at`; the row persists but leaves all normal queries.
    async fn soft_delete(&self, id: i64) -> Result<(), RepoError>;

    /// Atomic `views_count` bump for a qualifying public read.
    async fn increment_views(&self, id: i64) -> Result<(), RepoError>;
}

/// Fields for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub role: Role,
}

/// Partial user update; `None` fields are left untouched. `bio` is a
/// doubled `Option` so `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<Option<String>>,
    pub role: Option<Role>,
}

/// User persistence; users are always returned with their role set.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn list(&self) -> Result<Vec<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

/// Writable category fields.
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name, with post counts.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn exists(&self, id: i64) -> Result<bool, RepoError>;

    async fn create(&self, record: CategoryRecord) -> Result<Category, RepoError>;

    async fn update(&self, id: i64, record: CategoryRecord) -> Result<Category, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags ordered by name, with post counts.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Ids from `ids` that do not reference an existing tag.
    async fn missing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, RepoError>;
}
