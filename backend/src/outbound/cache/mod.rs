//! In-process feed cache adapter.
//!
//! Entries live for a fixed TTL from the moment they are written; a read
//! within the window returns the stored rendering even if posts changed in
//! the meantime. [`crate::domain::ports::FeedCache::invalidate`] drops
//! everything at once.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::FeedCache;

/// Default lifetime of a cached feed page.
pub const DEFAULT_FEED_TTL: Duration = Duration::from_secs(20);

/// TTL-bounded in-memory implementation of the `FeedCache` port.
#[derive(Debug)]
pub struct MemoryFeedCache {
    entries: Mutex<HashMap<String, (Instant, Value)>>,
    ttl: Duration,
}

impl MemoryFeedCache {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_FEED_TTL)
    }

    /// Create a cache whose entries expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Instant, Value)>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MemoryFeedCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedCache for MemoryFeedCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: &str, value: Value) {
        self.lock().insert(key.to_owned(), (Instant::now(), value));
    }

    async fn invalidate(&self) {
        let mut entries = self.lock();
        debug!(dropped = entries.len(), "feed cache invalidated");
        entries.clear();
    }
}
