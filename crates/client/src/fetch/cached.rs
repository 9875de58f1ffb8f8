//! Fetch-or-read-cache layer.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::StatusCode;
use stockroom_core::{Error, Namespace, PageCache};

use super::FetchClient;

/// Source of page bodies by URL.
///
/// The pagination loop and the scrape pipeline only need text for a URL,
/// so they run unchanged against the network-backed [`CachedFetcher`] or an
/// in-memory fixture.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Return the body of `url`, stored under `namespace` when cached.
    async fn page_text(&self, namespace: Namespace, url: &str) -> Result<String, Error>;
}

/// A page body and where it came from.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub text: String,
    /// Cache file holding the compressed body.
    pub path: PathBuf,
    /// True when the body was read from disk without a request.
    pub from_cache: bool,
}

/// Fetch client fronted by the on-disk page cache.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    client: FetchClient,
    cache: PageCache,
    force_refresh: bool,
}

impl CachedFetcher {
    pub fn new(client: FetchClient, cache: PageCache) -> Self {
        Self { client, cache, force_refresh: false }
    }

    /// Skip cache reads; every fetch goes to the network and overwrites its entry.
    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Return the body for `url`, reading the cache first.
    ///
    /// On a miss the page is requested. Only a `200 OK` body is compressed
    /// into the cache; other 2xx bodies are returned uncached. A failed
    /// request leaves the cache untouched.
    pub async fn fetch_page(&self, namespace: Namespace, url: &str) -> Result<CachedPage, Error> {
        let path = self.cache.path_for(namespace, url);

        if !self.force_refresh
            && let Some(text) = self.cache.get(namespace, url)?
        {
            return Ok(CachedPage { text, path, from_cache: true });
        }

        tracing::debug!("cache miss for {}, sending request", url);

        let response = self.client.fetch(url).await?;
        if response.status == StatusCode::OK {
            self.cache.put(namespace, url, &response.bytes)?;
        } else {
            tracing::warn!("not caching {} response for {}", response.status.as_u16(), url);
        }

        Ok(CachedPage { text: response.text(), path, from_cache: false })
    }
}

#[async_trait]
impl PageSource for CachedFetcher {
    async fn page_text(&self, namespace: Namespace, url: &str) -> Result<String, Error> {
        self.fetch_page(namespace, url).await.map(|page| page.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use std::fs;
    use stockroom_core::cache::compute_cache_key;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(root: &std::path::Path) -> CachedFetcher {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        CachedFetcher::new(client, PageCache::new(root))
    }

    fn cache_files(dir: PathBuf) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_first_fetch_writes_one_file_second_is_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shop"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>catalog</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(tmp.path());
        let url = format!("{}/shop", server.uri());

        let first = fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        assert!(!first.from_cache);

        let files = cache_files(fetcher.cache().dir(Namespace::MainPage));
        assert_eq!(files, vec![format!("{}.html.gz", compute_cache_key(&url))]);

        let second = fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
        assert_eq!(first.path, second.path);
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(tmp.path());
        let url = format!("{}/missing", server.uri());

        let result = fetcher.fetch_page(Namespace::MainPage, &url).await;
        assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
        assert!(!fetcher.cache().contains(Namespace::MainPage, &url));

        // Nothing was cached, so the retry goes back to the network.
        let result = fetcher.fetch_page(Namespace::MainPage, &url).await;
        assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_non_ok_success_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(tmp.path());
        let url = format!("{}/empty", server.uri());

        let page = fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        assert!(page.text.is_empty());
        assert!(!fetcher.cache().contains(Namespace::MainPage, &url));

        let again = fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        assert!(!again.from_cache);
    }

    #[tokio::test]
    async fn test_cache_hit_needs_no_server() {
        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(tmp.path());
        let url = "http://127.0.0.1:9/never-requested";

        fetcher.cache().put(Namespace::CategoryPages, url, b"{\"items\":[]}").unwrap();

        let text = fetcher.page_text(Namespace::CategoryPages, url).await.unwrap();
        assert_eq!(text, "{\"items\":[]}");
    }

    #[tokio::test]
    async fn test_force_refresh_overwrites_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let url = format!("{}/page", server.uri());
        let fetcher = fetcher(tmp.path()).with_force_refresh(true);
        fetcher.cache().put(Namespace::MainPage, &url, b"stale").unwrap();

        let page = fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        assert!(!page.from_cache);
        assert_eq!(page.text, "fresh");
        assert_eq!(fetcher.cache().get(Namespace::MainPage, &url).unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .expect(2)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(tmp.path());
        let url = format!("{}/same", server.uri());

        fetcher.fetch_page(Namespace::MainPage, &url).await.unwrap();
        fetcher.fetch_page(Namespace::CategoryPages, &url).await.unwrap();

        assert!(fetcher.cache().contains(Namespace::MainPage, &url));
        assert!(fetcher.cache().contains(Namespace::CategoryPages, &url));
    }
}
