//! Post entity and its publication lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Tag};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            _ => Err(()),
        }
    }
}

/// Author summary carried on an eager-loaded post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
}

/// Post entity - a blog post and its lifecycle fields.
///
/// `slug` and `author_id` are write-once. `deleted_at` marks soft
/// deletion; repositories exclude soft-deleted rows from every query.
/// Relations (`author`, `category`, `tags`) are populated by the
/// repository eager-load, not by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub views_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    pub author: Option<Author>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Publicly visible: published status with a publication time that
    /// has passed. A scheduled post stays author/admin-only until then.
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published && self.published_at.is_some_and(|ts| ts <= Utc::now())
    }
}

/// Apply a status change to a post, defaulting `published_at`.
///
/// The timestamp is set exactly once: on the first transition to
/// `Published` while `published_at` is unset and the caller supplied
/// none. A caller-supplied timestamp always wins. Transitions away from
/// `Published` never clear the timestamp, so re-publishing a
/// previously-published post keeps its original publication time.
pub fn apply_status_change(
    post: &mut Post,
    new_status: PostStatus,
    supplied_published_at: Option<DateTime<Utc>>,
) {
    if new_status == PostStatus::Published {
        if let Some(supplied) = supplied_published_at {
            post.published_at = Some(supplied);
        } else if post.published_at.is_none() {
            post.published_at = Some(Utc::now());
        }
    }
    post.status = new_status;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "Why Slower Mornings Matter".to_string(),
            slug: "why-slower-mornings-matter".to_string(),
            excerpt: "Slow down.".to_string(),
            content: "A long meditation on mornings.".to_string(),
            status: PostStatus::Draft,
            featured_image: None,
            author_id: 2,
            category_id: None,
            views_count: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            author: None,
            category: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn first_publish_defaults_published_at() {
        let mut post = draft();
        let before = Utc::now();
        apply_status_change(&mut post, PostStatus::Published, None);
        let after = Utc::now();

        assert_eq!(post.status, PostStatus::Published);
        let ts = post.published_at.expect("published_at must be set");
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn second_publish_is_idempotent() {
        let mut post = draft();
        apply_status_change(&mut post, PostStatus::Published, None);
        let first = post.published_at;

        apply_status_change(&mut post, PostStatus::Published, None);
        assert_eq!(post.published_at, first);
    }

    #[test]
    fn supplied_timestamp_wins() {
        let mut post = draft();
        let scheduled = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        apply_status_change(&mut post, PostStatus::Published, Some(scheduled));
        assert_eq!(post.published_at, Some(scheduled));

        // An explicit timestamp also overrides an existing one.
        let moved = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
        apply_status_change(&mut post, PostStatus::Published, Some(moved));
        assert_eq!(post.published_at, Some(moved));
    }

    #[test]
    fn unpublish_preserves_published_at() {
        let mut post = draft();
        apply_status_change(&mut post, PostStatus::Published, None);
        let first = post.published_at;

        apply_status_change(&mut post, PostStatus::Draft, None);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.published_at, first);
    }

    #[test]
    fn republish_does_not_reset_published_at() {
        let mut post = draft();
        apply_status_change(&mut post, PostStatus::Published, None);
        let first = post.published_at;

        apply_status_change(&mut post, PostStatus::Draft, None);
        apply_status_change(&mut post, PostStatus::Published, None);
        assert_eq!(post.published_at, first);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in PostStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
        assert!(PostStatus::from_str("pending").is_err());
    }
}
