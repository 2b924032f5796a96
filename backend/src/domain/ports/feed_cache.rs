//! Port for the shared global-feed cache.
//!
//! The cache holds fully rendered feed pages for a bounded time window.
//! Readers within the window observe a stale snapshot even after posts are
//! written; only expiry or an explicit [`FeedCache::invalidate`] refreshes
//! the view. That staleness is deliberate, not a bug.

use async_trait::async_trait;
use serde_json::Value;

/// Port for the page-level feed cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Fetch a cached rendering, if present and not expired.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a rendering; the adapter applies its configured TTL.
    async fn put(&self, key: &str, value: Value);

    /// Drop every cached entry. The administrative escape hatch.
    async fn invalidate(&self);
}

/// Cache adapter that never stores anything.
///
/// Use it where caching behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedCache;

#[async_trait]
impl FeedCache for NoopFeedCache {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn put(&self, _key: &str, _value: Value) {}

    async fn invalidate(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoopFeedCache;
        cache.put("feed:global:1", json!({"items": []})).await;
        assert!(cache.get("feed:global:1").await.is_none());
    }
}
