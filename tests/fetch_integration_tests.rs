//! Integration Tests for the Expiring Fetch Cache
//!
//! Serves pages from a local axum server and fetches them over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tracked_cache::{CacheError, ExpiringFetchCache, HttpFetcher, KeyValueStore, MemoryStore};

// == Helper Functions ==

/// Starts a page server on an ephemeral port and returns its base URL.
async fn spawn_page_server() -> String {
    let app = Router::new()
        .route("/page", get(|| async { "<html>hello</html>" }))
        .route("/other", get(|| async { "<html>other</html>" }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Fetcher that talks to the local server directly, ignoring proxy settings.
fn local_fetcher() -> HttpFetcher {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    HttpFetcher::from_client(client)
}

// == Tests ==

#[tokio::test]
async fn test_fetch_returns_content_and_counts() {
    let base = spawn_page_server().await;
    let url = format!("{}/page", base);
    let store = Arc::new(MemoryStore::new());
    let cache = ExpiringFetchCache::new(Arc::clone(&store), local_fetcher());

    for expected in 1..=3 {
        let content = cache.fetch(&url).await.unwrap();
        assert_eq!(content, "<html>hello</html>");
        assert_eq!(cache.access_count(&url).await.unwrap(), Some(expected));
    }

    // The counter lives in the shared store under count:{url}
    let raw = store.get(&format!("count:{}", url)).await.unwrap();
    assert_eq!(raw, Some(b"3".to_vec()));

    let remaining = cache.window_remaining(&url).await.unwrap().unwrap();
    assert!(remaining <= Duration::from_secs(10));
    assert!(remaining > Duration::from_secs(8));
}

#[tokio::test]
async fn test_window_expiry_resets_counter() {
    let base = spawn_page_server().await;
    let url = format!("{}/page", base);
    let cache = ExpiringFetchCache::with_window(
        Arc::new(MemoryStore::new()),
        local_fetcher(),
        Duration::from_secs(1),
    );

    cache.fetch(&url).await.unwrap();
    cache.fetch(&url).await.unwrap();
    assert_eq!(cache.access_count(&url).await.unwrap(), Some(2));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    cache.fetch(&url).await.unwrap();
    assert_eq!(cache.access_count(&url).await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_unreachable_url_still_counts() {
    // Bind then drop a listener so the port is known to be closed
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/gone", addr);
    let cache = ExpiringFetchCache::new(
        Arc::new(MemoryStore::new()),
        local_fetcher(),
    );

    let result = cache.fetch(&url).await;

    assert!(matches!(result, Err(CacheError::Fetch(_))));
    assert_eq!(cache.access_count(&url).await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_error_status_returns_body_and_counts() {
    let base = spawn_page_server().await;
    let url = format!("{}/missing", base);
    let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), local_fetcher());

    assert_eq!(cache.fetch(&url).await.unwrap(), "nope");
    assert_eq!(cache.fetch(&url).await.unwrap(), "nope");

    assert_eq!(cache.access_count(&url).await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_urls_have_independent_counters() {
    let base = spawn_page_server().await;
    let page = format!("{}/page", base);
    let other = format!("{}/other", base);
    let cache = ExpiringFetchCache::new(Arc::new(MemoryStore::new()), local_fetcher());

    cache.fetch(&page).await.unwrap();
    cache.fetch(&page).await.unwrap();
    assert_eq!(cache.fetch(&other).await.unwrap(), "<html>other</html>");

    assert_eq!(cache.access_count(&page).await.unwrap(), Some(2));
    assert_eq!(cache.access_count(&other).await.unwrap(), Some(1));
}
