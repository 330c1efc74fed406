//! Directional subscriptions between users.

use serde::Serialize;

use super::UserId;

/// Attempted to build a follow from a user to themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("users cannot follow themselves")]
pub struct SelfFollow;

/// A `(follower, author)` pair.
///
/// ## Invariants
/// - `user != author`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Follow {
    user: UserId,
    author: UserId,
}

impl Follow {
    /// Build a follow, refusing self-subscriptions.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::{Follow, UserId};
    ///
    /// assert!(Follow::new(UserId::new(1), UserId::new(2)).is_ok());
    /// assert!(Follow::new(UserId::new(1), UserId::new(1)).is_err());
    /// ```
    pub fn new(user: UserId, author: UserId) -> Result<Self, SelfFollow> {
        if user == author {
            return Err(SelfFollow);
        }
        Ok(Self { user, author })
    }

    /// The follower.
    pub fn user(&self) -> UserId {
        self.user
    }

    /// The followed author.
    pub fn author(&self) -> UserId {
        self.author
    }
}
