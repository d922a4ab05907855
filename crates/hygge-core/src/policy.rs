//! Post visibility and authorization policy.
//!
//! A single pure function decides every post action. The action is a
//! tagged union carrying the post where one is involved; `Create` has no
//! post. The evaluator never mutates and never formats user-facing text;
//! the boundary maps a denial to `Unauthenticated` (no actor) or
//! `Forbidden` (wrong actor).

use crate::domain::{Actor, Post, Role};

/// An action an actor is attempting against the post content model.
#[derive(Debug, Clone, Copy)]
pub enum PostAction<'a> {
    Create,
    View(&'a Post),
    Update(&'a Post),
    Delete(&'a Post),
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Evaluate whether `actor` may perform `action`.
///
/// Rules, in precedence order:
/// 1. Create: actor must hold writer or admin.
/// 2. View: published posts are visible to everyone, including anonymous
///    callers; otherwise admin, or the authoring writer.
/// 3. Update/Delete: admin, or the authoring writer. Status is
///    irrelevant.
pub fn evaluate(actor: Option<&Actor>, action: PostAction<'_>) -> Decision {
    match action {
        PostAction::Create => match actor {
            Some(actor) if actor.has_role(Role::Writer) || actor.has_role(Role::Admin) => {
                Decision::Allow
            }
            _ => Decision::Deny,
        },
        PostAction::View(post) => {
            if post.is_published() {
                return Decision::Allow;
            }
            can_manage(actor, post)
        }
        PostAction::Update(post) | PostAction::Delete(post) => can_manage(actor, post),
    }
}

fn can_manage(actor: Option<&Actor>, post: &Post) -> Decision {
    match actor {
        Some(actor)
            if actor.has_role(Role::Admin)
                || (actor.has_role(Role::Writer) && actor.id == post.author_id) =>
        {
            Decision::Allow
        }
        _ => Decision::Deny,
    }
}
