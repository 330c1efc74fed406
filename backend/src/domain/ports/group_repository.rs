//! Port abstraction for reading topic groups.
use async_trait::async_trait;

use crate::domain::{Group, GroupSlug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "group repository query failed: {message}",
    }
}

/// Read access to groups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by its slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError>;

    /// List every group, ordered by title, for form choices.
    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError>;
}
