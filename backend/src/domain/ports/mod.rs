//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each driven adapter (database, cache, image store, renderer) implements
//! one of these traits and reports failures through the port's own error
//! enum.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod comment_repository;
mod follow_repository;
mod group_repository;
mod image_store;
mod page_cache;
mod page_renderer;
mod post_repository;
mod user_repository;

pub use cache_key::{CacheKey, CacheKeyValidationError};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowPersistenceError, FollowRepository};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupPersistenceError, GroupRepository};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{PageCache, PageCacheError};
#[cfg(test)]
pub use page_renderer::MockPageRenderer;
pub use page_renderer::{PageRenderError, PageRenderer};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
