//! Port abstraction for follow persistence.
use async_trait::async_trait;

use crate::domain::Follow;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

/// Storage for follows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert the follow unless it already exists, atomically.
    ///
    /// Returns `true` when a row was created.
    async fn insert_if_absent(&self, follow: &Follow) -> Result<bool, FollowPersistenceError>;

    /// Delete the follow if present.
    ///
    /// Returns `true` when a row was removed.
    async fn delete(&self, follow: &Follow) -> Result<bool, FollowPersistenceError>;

    /// Whether the follow exists.
    async fn exists(&self, follow: &Follow) -> Result<bool, FollowPersistenceError>;
}
