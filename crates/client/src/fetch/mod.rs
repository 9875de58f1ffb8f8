//! HTTP fetch pipeline with browser emulation and an on-disk page cache.
//!
//! ### Request shape
//! - Every request carries a fixed browser-like header set (Firefox 106).
//! - The HTTP method is chosen by the caller; `GET` unless configured.
//! - Any non-2xx status is a failure. Client and server errors are not told
//!   apart and nothing is retried.
//!
//! ### Caching
//! - [`CachedFetcher`] consults a [`PageCache`](stockroom_core::PageCache)
//!   before touching the network and stores successful bodies only.

pub mod cached;
pub mod url;

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use std::time::{Duration, Instant};

pub use cached::{CachedFetcher, CachedPage, PageSource};
pub use self::url::{UrlError, parse_http_url};

use stockroom_core::{AppConfig, Error};

/// Headers sent with every request, minus User-Agent which comes from config.
pub const BROWSER_HEADERS: [(&str, &str); 9] = [
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.5"),
    ("dnt", "1"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
];

/// Build the fixed browser-emulation header map.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len());
    for (name, value) in BROWSER_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: Firefox 106 on Windows)
    pub user_agent: String,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// HTTP method for every request (default: GET)
    pub method: Method,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        let timeout = app.timeout();
        Self { user_agent: app.user_agent, timeout, method: Method::GET, max_redirects: 10 }
    }
}

impl FetchConfig {
    /// Derive fetch settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let method = Method::from_bytes(config.http_method.as_bytes())
            .map_err(|e| Error::InvalidInput(format!("invalid HTTP method {:?}: {}", config.http_method, e)))?;

        Ok(Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), method, ..Default::default() })
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL as requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// HTTP fetch client sending browser-like requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(browser_headers())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL with the configured method, returning raw bytes and metadata.
    ///
    /// A non-success status is returned as [`Error::HttpStatus`].
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        self.fetch_with_method(self.config.method.clone(), url_str).await
    }

    /// Fetch a URL with an explicit HTTP method.
    pub async fn fetch_with_method(&self, method: Method, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = parse_http_url(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self.http.request(method, url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{}: {}", url, e))
            } else {
                Error::HttpError(format!("network error: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            tracing::warn!("HTTP status code: {} for {}", status.as_u16(), url);
            return Err(Error::HttpStatus { status: status.as_u16(), url: url_str.to_string() });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{}: {}", url, e))
            } else {
                Error::HttpError(format!("failed to read response: {}", e))
            }
        })?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url, final_url, status, content_type, bytes, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FetchConfig {
        FetchConfig { timeout: Duration::from_secs(5), ..Default::default() }
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.method, Method::GET);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { http_method: "POST".into(), timeout_ms: 1500, ..Default::default() };
        let config = FetchConfig::from_app_config(&app).unwrap();
        assert_eq!(config.method, Method::POST);
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert_eq!(headers.len(), BROWSER_HEADERS.len());
        assert_eq!(headers.get("sec-fetch-user").unwrap(), "?1");
        assert_eq!(headers.get("dnt").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_eq("dnt", "1"))
            .and(header_eq("sec-fetch-mode", "navigate"))
            .and(header_eq("user-agent", FetchConfig::default().user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(test_config()).unwrap();
        let response = client.fetch(&format!("{}/", server.uri())).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text(), "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_uses_configured_method() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let config = FetchConfig { method: Method::POST, ..test_config() };
        let client = FetchClient::new(config).unwrap();
        let response = client.fetch(&format!("{}/items", server.uri())).await.unwrap();
        assert_eq!(response.text(), "{}");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FetchClient::new(test_config()).unwrap();
        let url = format!("{}/down", server.uri());
        let result = client.fetch(&url).await;

        match result {
            Err(Error::HttpStatus { status, url: failed }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = FetchClient::new(test_config()).unwrap();
        let result = client.fetch("not a url").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
