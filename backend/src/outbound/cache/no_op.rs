//! Cache adapter that stores nothing.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RenderedPage;
use crate::domain::ports::{CacheKey, PageCache, PageCacheError};

/// Page cache that always misses and discards writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPageCache;

#[async_trait]
impl PageCache for NoOpPageCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<RenderedPage>, PageCacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &CacheKey,
        _page: &RenderedPage,
        _ttl: Duration,
    ) -> Result<(), PageCacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Template;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn always_misses_after_set() {
        let cache = NoOpPageCache;
        let key = CacheKey::new("index_page").expect("valid key");
        let page = RenderedPage {
            template: Template::Index,
            body: "body".to_owned(),
        };

        cache
            .set(&key, &page, Duration::from_secs(20))
            .await
            .expect("set succeeds");

        assert!(cache.get(&key).await.expect("get succeeds").is_none());
    }
}
