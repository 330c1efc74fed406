//! Port interface for caching whole rendered pages.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RenderedPage;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by page cache adapters.
    pub enum PageCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

/// Shared store of rendered pages with per-entry expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Read an unexpired page.
    async fn get(&self, key: &CacheKey) -> Result<Option<RenderedPage>, PageCacheError>;

    /// Store a page for `ttl`, replacing any previous entry.
    async fn set(
        &self,
        key: &CacheKey,
        page: &RenderedPage,
        ttl: Duration,
    ) -> Result<(), PageCacheError>;

    /// Drop every entry.
    async fn clear(&self) -> Result<(), PageCacheError>;
}
