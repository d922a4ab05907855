use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity - a free-form label attached to posts (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Number of tagged posts; populated on listings only.
    pub posts_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
