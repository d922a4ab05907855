//! The caller identity the policy evaluates against.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named privilege grouping. Anything outside this set carries no
/// content privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Writer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Writer => write!(f, "writer"),
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "writer" => Ok(Role::Writer),
            _ => Err(()),
        }
    }
}

/// An authenticated caller: id plus role set. Role membership is a set
/// lookup, not a single tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub roles: HashSet<Role>,
}

impl Actor {
    pub fn new(id: i64, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_names_only() {
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert_eq!("writer".parse(), Ok(Role::Writer));
        assert!(Role::from_str("editor").is_err());
    }

    #[test]
    fn has_role_checks_set_membership() {
        let actor = Actor::new(7, [Role::Writer]);
        assert!(actor.has_role(Role::Writer));
        assert!(!actor.has_role(Role::Admin));
    }
}
