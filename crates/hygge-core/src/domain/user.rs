use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Actor, Role};

/// User entity - an account that may author and manage content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The policy-facing view of this user.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.roles.iter().copied())
    }
}
