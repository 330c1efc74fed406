//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Storage for comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// List the comments on a post, newest first.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Insert a comment and return it as stored.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;
}
