//! In-memory repositories.
//!
//! [`InMemoryStore`] implements every repository port over a single
//! mutex-guarded state, so each operation is atomic. It backs the
//! integration tests and serves as the fallback store when no database URL
//! is configured.

mod repositories;
mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Group, GroupId, GroupSlug, User, UserId, Username};

use self::state::State;

/// Shared in-process store for users, groups, posts, comments and follows.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

/// The store's mutex was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("in-memory store lock poisoned")]
pub struct StorePoisoned;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, as the identity subsystem would.
    pub fn add_user(&self, username: Username) -> Result<User, StorePoisoned> {
        let mut state = self.lock()?;
        let user = User::new(UserId::new(state.next_id()), username);
        state.users.push(user.clone());
        Ok(user)
    }

    /// Register a group, as an administrator would.
    pub fn add_group(
        &self,
        title: &str,
        slug: GroupSlug,
        description: &str,
    ) -> Result<Group, StorePoisoned> {
        let mut state = self.lock()?;
        let group = Group::new(GroupId::new(state.next_id()), title, slug, description);
        state.groups.push(group.clone());
        Ok(group)
    }

    /// Number of stored follow rows.
    pub fn follow_count(&self) -> Result<usize, StorePoisoned> {
        Ok(self.lock()?.follows.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StorePoisoned> {
        self.state.lock().map_err(|_| StorePoisoned)
    }
}
