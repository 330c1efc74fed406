//! Read-through helper over the [`PageCache`] port.
//!
//! Cache failures degrade to an uncached render; they never turn a readable
//! page into an error.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::ports::{CacheKey, PageCache};
use super::{Error, RenderedPage};

/// Key of the cached index listing.
pub const INDEX_CACHE_KEY: &str = "index_page";

/// How long the index listing is served from cache.
pub const INDEX_CACHE_TTL: Duration = Duration::from_secs(20);

/// Return the cached page for `key`, or render, store and return it.
///
/// A hit returns the stored bytes unchanged, even if the underlying data
/// has changed since they were rendered.
pub async fn get_or_render<F, Fut>(
    cache: &dyn PageCache,
    key: &CacheKey,
    ttl: Duration,
    render: F,
) -> Result<RenderedPage, Error>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<RenderedPage, Error>>,
{
    match cache.get(key).await {
        Ok(Some(page)) => {
            debug!(key = %key, "page cache hit");
            return Ok(page);
        }
        Ok(None) => debug!(key = %key, "page cache miss"),
        Err(err) => warn!(key = %key, error = %err, "page cache read failed; rendering uncached"),
    }

    let page = render().await?;
    if let Err(err) = cache.set(key, &page, ttl).await {
        warn!(key = %key, error = %err, "page cache write failed");
    }
    Ok(page)
}
