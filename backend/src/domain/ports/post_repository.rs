//! Port abstraction for post persistence.
//!
//! Listings are always ordered newest-first by publication date, with ties
//! broken by descending id, so that page slices are deterministic.
use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostFilter, PostId, PostUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Storage for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Count posts selected by `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, PostPersistenceError>;

    /// List one slice of the posts selected by `filter`.
    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostPersistenceError>;

    /// Fetch a post by id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a post and return it as stored.
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Replace the editable fields of a post.
    ///
    /// Returns `None` when the post no longer exists.
    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostPersistenceError>;
}
