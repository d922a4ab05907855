//! PostgreSQL repository implementations.
//!
//! Every post query filters out soft-deleted rows and returns posts with
//! their author, category and tags hydrated.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, JoinType, LoaderTrait, ModelTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use hygge_core::domain::{Author, Category, Post, PostStatus, Tag, User};
use hygge_core::error::RepoError;
use hygge_core::ports::{
    CategoryRecord, CategoryRepository, NewUser, Page, PostRecord, PostRepository, TagRepository,
    UserRepository, UserUpdate,
};

use super::entity::{category, post, post_tag, role, tag, user, user_role};

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Map write failures, promoting unique-index violations to constraint
/// errors so the boundary can answer with a conflict.
fn write_err(e: DbErr) -> RepoError {
    if matches!(e, DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }
    let msg = e.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint(msg)
    } else {
        RepoError::Query(msg)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Non-deleted posts only; the starting point for every query.
    fn base_query() -> Select<post::Entity> {
        post::Entity::find().filter(post::Column::DeletedAt.is_null())
    }

    /// Attach author, category and tags to a batch of rows.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let authors = models
            .load_one(user::Entity, &self.db)
            .await
            .map_err(query_err)?;
        let categories = models
            .load_one(category::Entity, &self.db)
            .await
            .map_err(query_err)?;
        let tags = models
            .load_many_to_many(tag::Entity, post_tag::Entity, &self.db)
            .await
            .map_err(query_err)?;

        Ok(models
            .into_iter()
            .zip(authors)
            .zip(categories)
            .zip(tags)
            .map(|(((model, author), category), tags)| {
                let mut domain: Post = model.into();
                domain.author = author.map(|u| Author {
                    id: u.id,
                    name: u.name,
                    bio: u.bio,
                });
                domain.category = category.map(Into::into);
                domain.tags = tags.into_iter().map(Into::into).collect();
                domain
            })
            .collect())
    }

    async fn hydrate_one(&self, model: Option<post::Model>) -> Result<Option<Post>, RepoError> {
        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn fetch_required(&self, id: i64) -> Result<Post, RepoError> {
        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }

    async fn paginate(
        &self,
        query: Select<post::Entity>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await.map_err(query_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(query_err)?;
        let items = self.hydrate(models).await?;
        Ok(Page {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Replace the tag set of a post.
    async fn sync_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepoError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(*tag_id),
        });
        post_tag::Entity::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let model = Self::base_query()
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        self.hydrate_one(model).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let model = Self::base_query()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        self.hydrate_one(model).await
    }

    async fn list_published(
        &self,
        category_id: Option<i64>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let mut query = Self::base_query()
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .filter(post::Column::PublishedAt.is_not_null())
            .filter(post::Column::PublishedAt.lte(Utc::now().fixed_offset()))
            .order_by_desc(post::Column::PublishedAt);

        if let Some(category_id) = category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        self.paginate(query, page, per_page).await
    }

    async fn list_all(&self, page: u64, per_page: u64) -> Result<Page<Post>, RepoError> {
        let query = Self::base_query().order_by_desc(post::Column::CreatedAt);
        self.paginate(query, page, per_page).await
    }

    async fn create(&self, record: PostRecord, tag_ids: &[i64]) -> Result<Post, RepoError> {
        let now = Utc::now().fixed_offset();
        let active = post::ActiveModel {
            id: NotSet,
            title: Set(record.title),
            slug: Set(record.slug),
            excerpt: Set(record.excerpt),
            content: Set(record.content),
            status: Set(record.status.as_str().to_string()),
            featured_image: Set(record.featured_image),
            author_id: Set(record.author_id),
            category_id: Set(record.category_id),
            views_count: Set(0),
            published_at: Set(record.published_at.map(|ts| ts.fixed_offset())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active.insert(&self.db).await.map_err(write_err)?;
        tracing::debug!(post_id = model.id, "post row inserted");

        self.sync_tags(model.id, tag_ids).await?;
        self.fetch_required(model.id).await
    }

    async fn update(
        &self,
        id: i64,
        record: PostRecord,
        tag_ids: Option<&[i64]>,
    ) -> Result<Post, RepoError> {
        // author_id is write-once and views_count is store-owned;
        // neither is touched here.
        let active = post::ActiveModel {
            id: Set(id),
            title: Set(record.title),
            slug: Set(record.slug),
            excerpt: Set(record.excerpt),
            content: Set(record.content),
            status: Set(record.status.as_str().to_string()),
            featured_image: Set(record.featured_image),
            category_id: Set(record.category_id),
            published_at: Set(record.published_at.map(|ts| ts.fixed_offset())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        active.update(&self.db).await.map_err(write_err)?;

        if let Some(tag_ids) = tag_ids {
            self.sync_tags(id, tag_ids).await?;
        }

        self.fetch_required(id).await
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepoError> {
        let result = post::Entity::update_many()
            .col_expr(
                post::Column::DeletedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<(), RepoError> {
        post::Entity::update_many()
            .col_expr(
                post::Column::ViewsCount,
                Expr::col(post::Column::ViewsCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

/// PostgreSQL user repository. Users always come back with their roles.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn to_domain(model: user::Model, roles: Vec<role::Model>) -> User {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            bio: model.bio,
            roles: roles
                .into_iter()
                .filter_map(|r| r.name.parse().ok())
                .collect(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    async fn with_roles(&self, model: user::Model) -> Result<User, RepoError> {
        let roles = model
            .find_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(Self::to_domain(model, roles))
    }

    async fn assign_role(&self, user_id: i64, role_name: &str) -> Result<(), RepoError> {
        let role = role::Entity::find()
            .filter(role::Column::Name.eq(role_name))
            .one(&self.db)
            .await
            .map_err(query_err)?
            .ok_or_else(|| RepoError::Constraint(format!("role '{role_name}' is not seeded")))?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        }
        .insert(&self.db)
        .await
        .map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        match model {
            Some(model) => Ok(Some(self.with_roles(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        match model {
            Some(model) => Ok(Some(self.with_roles(model).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let roles = models
            .load_many_to_many(role::Entity, user_role::Entity, &self.db)
            .await
            .map_err(query_err)?;

        Ok(models
            .into_iter()
            .zip(roles)
            .map(|(model, roles)| Self::to_domain(model, roles))
            .collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now().fixed_offset();
        let role = new_user.role;
        let active = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            bio: Set(new_user.bio),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await.map_err(write_err)?;

        self.assign_role(model.id, &role.to_string()).await?;
        self.with_roles(model).await
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, RepoError> {
        let mut active = user::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = update.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(bio) = update.bio {
            active.bio = Set(bio);
        }

        let model = active.update(&self.db).await.map_err(write_err)?;

        if let Some(role) = update.role {
            self.assign_role(id, &role.to_string()).await?;
        }
        self.with_roles(model).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Non-deleted post counts keyed by category.
    async fn post_counts(&self) -> Result<HashMap<i64, u64>, RepoError> {
        let counts: Vec<(i64, i64)> = post::Entity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(post::Column::Id.count(), "count")
            .filter(post::Column::DeletedAt.is_null())
            .filter(post::Column::CategoryId.is_not_null())
            .group_by(post::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(counts
            .into_iter()
            .map(|(id, count)| (id, count as u64))
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let counts = self.post_counts().await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let mut domain: Category = model.into();
                domain.posts_count = Some(counts.get(&domain.id).copied().unwrap_or(0));
                domain
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let model = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        let count = category::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(query_err)?;
        Ok(count > 0)
    }

    async fn create(&self, record: CategoryRecord) -> Result<Category, RepoError> {
        let now = Utc::now().fixed_offset();
        let active = category::ActiveModel {
            id: NotSet,
            name: Set(record.name),
            slug: Set(record.slug),
            description: Set(record.description),
            color: Set(record.color),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = active.insert(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: i64, record: CategoryRecord) -> Result<Category, RepoError> {
        let active = category::ActiveModel {
            id: Set(id),
            name: Set(record.name),
            slug: Set(record.slug),
            description: Set(record.description),
            color: Set(record.color),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let model = active.update(&self.db).await.map_err(write_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: DbConn,
}

impl PostgresTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Counts of non-deleted tagged posts keyed by tag.
    async fn post_counts(&self) -> Result<HashMap<i64, u64>, RepoError> {
        let counts: Vec<(i64, i64)> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .column_as(post_tag::Column::PostId.count(), "count")
            .join(JoinType::InnerJoin, post_tag::Relation::Post.def())
            .filter(post::Column::DeletedAt.is_null())
            .group_by(post_tag::Column::TagId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(counts
            .into_iter()
            .map(|(id, count)| (id, count as u64))
            .collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let counts = self.post_counts().await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let mut domain: Tag = model.into();
                domain.posts_count = Some(counts.get(&domain.id).copied().unwrap_or(0));
                domain
            })
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let model = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn missing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, RepoError> {
        let found: HashSet<i64> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|t| t.id)
            .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}
