use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity - a named grouping posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Number of posts in the category; populated on listings only.
    pub posts_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
