//! Ownership rule shared by every item operation.
//!
//! A subject may read, update or delete a resource iff it owns it or is privileged.
//! Creation is not gated: the creator always becomes the owner.

use crate::auth::Identity;

/// Operation kinds that touch an existing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool { matches!(self, Decision::Allow) }
}

/// Decide access to a resource owned by `owner_id`.
///
/// The operation does not change the outcome; it is taken so call sites state intent
/// and so decisions can be logged per kind.
pub fn authorize(identity: &Identity, owner_id: &str, _operation: Operation) -> Decision {
    if identity.is_privileged || identity.subject_id == owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Owner filter for listings: `None` means every resource is visible.
pub fn scope(identity: &Identity) -> Option<&str> {
    if identity.is_privileged { None } else { Some(identity.subject_id.as_str()) }
}
