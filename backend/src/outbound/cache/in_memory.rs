//! In-process page cache with clock-driven expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::RenderedPage;
use crate::domain::ports::{CacheKey, PageCache, PageCacheError};

#[derive(Debug, Clone)]
struct Entry {
    page: RenderedPage,
    expires_at: DateTime<Utc>,
}

/// Page cache shared by every request in the process.
///
/// Entries expire `ttl` after they are stored, as measured by the injected
/// clock. Expired entries are evicted on read.
#[derive(Clone)]
pub struct InMemoryPageCache {
    entries: Arc<Mutex<HashMap<CacheKey, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPageCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, Entry>>, PageCacheError> {
        self.entries
            .lock()
            .map_err(|_| PageCacheError::backend("page cache lock poisoned"))
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<RenderedPage>, PageCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.page.clone())),
            Some(_) => {
                entries.remove(key);
                debug!(key = %key, "evicted expired page");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &CacheKey,
        page: &RenderedPage,
        ttl: Duration,
    ) -> Result<(), PageCacheError> {
        let lifetime = TimeDelta::from_std(ttl)
            .map_err(|err| PageCacheError::backend(format!("invalid ttl: {err}")))?;
        let entry = Entry {
            page: page.clone(),
            expires_at: self.clock.utc() + lifetime,
        };
        self.lock()?.insert(key.clone(), entry);
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Template;
    use crate::test_support::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    const TTL: Duration = Duration::from_secs(20);

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(start))
    }

    #[fixture]
    fn key() -> CacheKey {
        CacheKey::new("index_page").expect("valid key")
    }

    fn page(body: &str) -> RenderedPage {
        RenderedPage {
            template: Template::Index,
            body: body.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn returns_entry_within_ttl(clock: Arc<MutableClock>, key: CacheKey) {
        let cache = InMemoryPageCache::new(clock.clone());
        cache.set(&key, &page("v1"), TTL).await.expect("set");

        clock.advance(Duration::from_secs(19));

        let hit = cache.get(&key).await.expect("get");
        assert_eq!(hit.map(|p| p.body), Some("v1".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn expires_entry_after_ttl(clock: Arc<MutableClock>, key: CacheKey) {
        let cache = InMemoryPageCache::new(clock.clone());
        cache.set(&key, &page("v1"), TTL).await.expect("set");

        clock.advance(TTL);

        assert!(cache.get(&key).await.expect("get").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn set_resets_the_window(clock: Arc<MutableClock>, key: CacheKey) {
        let cache = InMemoryPageCache::new(clock.clone());
        cache.set(&key, &page("v1"), TTL).await.expect("set");
        clock.advance(Duration::from_secs(15));
        cache.set(&key, &page("v2"), TTL).await.expect("set");
        clock.advance(Duration::from_secs(15));

        let hit = cache.get(&key).await.expect("get");
        assert_eq!(hit.map(|p| p.body), Some("v2".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn clear_drops_everything(clock: Arc<MutableClock>, key: CacheKey) {
        let cache = InMemoryPageCache::new(clock);
        cache.set(&key, &page("v1"), TTL).await.expect("set");

        cache.clear().await.expect("clear");

        assert!(cache.get(&key).await.expect("get").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn clones_share_entries(clock: Arc<MutableClock>, key: CacheKey) {
        let cache = InMemoryPageCache::new(clock);
        let other = cache.clone();
        cache.set(&key, &page("shared"), TTL).await.expect("set");

        assert!(other.get(&key).await.expect("get").is_some());
    }
}
