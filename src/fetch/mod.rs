//! Expiring Fetch Cache Module
//!
//! Tracks how often each resource is fetched within a time window. The
//! fetched content itself is never cached; only the access count is.
//!
//! # Store layout
//! - `count:{url}` - access counter, expires one window after the first
//!   access of the window

mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

pub use http::HttpFetcher;

// == Public Constants ==
/// Default access-counter window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

// == Fetcher ==
/// External collaborator that retrieves a resource's content.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Store key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

// == Expiring Fetch Cache ==
/// Fetches resources through a [`Fetcher`] while counting accesses per URL.
///
/// A counter that is absent or expired restarts at 1 with a fresh window;
/// later accesses within the window increment it without extending the
/// window.
pub struct ExpiringFetchCache<S: ?Sized, F> {
    store: Arc<S>,
    fetcher: F,
    window: Duration,
}

impl<S, F> ExpiringFetchCache<S, F>
where
    S: KeyValueStore + ?Sized,
    F: Fetcher,
{
    /// Creates a cache using [`DEFAULT_WINDOW`].
    pub fn new(store: Arc<S>, fetcher: F) -> Self {
        Self::with_window(store, fetcher, DEFAULT_WINDOW)
    }

    pub fn with_window(store: Arc<S>, fetcher: F, window: Duration) -> Self {
        Self {
            store,
            fetcher,
            window,
        }
    }

    // == Fetch ==
    /// Records an access to `url`, then fetches it.
    ///
    /// The access is counted before the fetch is issued, so a failed fetch
    /// still counts.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let count = self
            .store
            .incr_expiring(&count_key(url), self.window)
            .await?;
        debug!("Access #{} to {} in the current window", count, url);

        self.fetcher.fetch(url).await.inspect_err(|e| {
            warn!("Fetch of {} failed after counting access #{}: {}", url, count, e);
        })
    }

    /// Returns the access count of `url` in the current window, or None if
    /// no window is open.
    pub async fn access_count(&self, url: &str) -> Result<Option<i64>> {
        match self.store.get(&count_key(url)).await? {
            None => Ok(None),
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Some)
                .ok_or_else(|| {
                    CacheError::decode(format!("access counter for {} is not a number", url))
                }),
        }
    }

    /// Returns how long the current window of `url` stays open.
    pub async fn window_remaining(&self, url: &str) -> Result<Option<Duration>> {
        self.store.ttl(&count_key(url)).await
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher returning canned content and counting its calls.
    #[derive(Default)]
    struct StubFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<html>{}</html>", url))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(CacheError::Fetch(format!("{}: connection refused", url)))
        }
    }

    const URL: &str = "http://example.test/page";

    #[tokio::test]
    async fn test_fetch_counts_accesses() {
        let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), StubFetcher::default());

        assert_eq!(cache.access_count(URL).await.unwrap(), None);

        for _ in 0..3 {
            let content = cache.fetch(URL).await.unwrap();
            assert_eq!(content, format!("<html>{}</html>", URL));
        }

        assert_eq!(cache.access_count(URL).await.unwrap(), Some(3));
        assert_eq!(cache.window(), DEFAULT_WINDOW);
    }

    #[tokio::test]
    async fn test_content_is_never_cached() {
        let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), StubFetcher::default());

        cache.fetch(URL).await.unwrap();
        cache.fetch(URL).await.unwrap();

        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_counter_resets_after_window() {
        let cache = ExpiringFetchCache::with_window(
            Arc::new(MemoryStore::new()),
            StubFetcher::default(),
            Duration::from_secs(1),
        );

        for _ in 0..3 {
            cache.fetch(URL).await.unwrap();
        }
        assert_eq!(cache.access_count(URL).await.unwrap(), Some(3));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.access_count(URL).await.unwrap(), None);

        cache.fetch(URL).await.unwrap();
        assert_eq!(cache.access_count(URL).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_hits_do_not_extend_window() {
        let cache = ExpiringFetchCache::with_window(
            Arc::new(MemoryStore::new()),
            StubFetcher::default(),
            Duration::from_secs(1),
        );

        cache.fetch(URL).await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        cache.fetch(URL).await.unwrap();

        let remaining = cache.window_remaining(URL).await.unwrap().unwrap();
        assert!(remaining <= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_failed_fetch_still_counts() {
        let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), FailingFetcher);

        let result = cache.fetch(URL).await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert_eq!(cache.access_count(URL).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_urls_are_counted_separately() {
        let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), StubFetcher::default());

        cache.fetch("http://a.test").await.unwrap();
        cache.fetch("http://a.test").await.unwrap();
        cache.fetch("http://b.test").await.unwrap();

        assert_eq!(cache.access_count("http://a.test").await.unwrap(), Some(2));
        assert_eq!(cache.access_count("http://b.test").await.unwrap(), Some(1));
    }

    #[test]
    fn test_count_key() {
        assert_eq!(count_key("http://example.com"), "count:http://example.com");
    }
}
