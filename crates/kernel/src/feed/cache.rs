//! TTL cache in front of another feed source.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::{FeedPayload, FeedRequest, FeedSource};
use crate::error::BlockResult;

/// Maximum number of cached sheets.
const MAX_CAPACITY: u64 = 1_000;

/// Caches successful fetches by request path. Failures are not cached.
pub struct CachedFeedSource<S> {
    inner: S,
    cache: Cache<String, FeedPayload>,
}

impl<S: FeedSource> CachedFeedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }

    /// Drop every cached sheet.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<S: FeedSource> FeedSource for CachedFeedSource<S> {
    async fn fetch(&self, request: &FeedRequest) -> BlockResult<FeedPayload> {
        let key = request.to_path();
        if let Some(payload) = self.cache.get(&key).await {
            debug!(key = %key, "feed cache hit");
            return Ok(payload);
        }

        let payload = self.inner.fetch(request).await?;
        self.cache.insert(key, payload.clone()).await;
        Ok(payload)
    }
}
