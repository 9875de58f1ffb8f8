//! URL validation ahead of fetching.
//!
//! Cache keys are derived from the URL text exactly as the caller wrote it,
//! so validation never rewrites the input; it only rejects what cannot be
//! requested.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("missing host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse `input` as an absolute http(s) URL.
///
/// Unlike a canonicalizer, this keeps the caller's spelling: no scheme is
/// defaulted and surrounding whitespace is an error rather than trimmed.
pub fn parse_http_url(input: &str) -> Result<url::Url, UrlError> {
    if input.trim().is_empty() {
        return Err(UrlError::Empty);
    }

    if input.trim() != input {
        return Err(UrlError::InvalidUrl(format!("surrounding whitespace in {input:?}")));
    }

    let parsed = url::Url::parse(input).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost(input.to_string()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let url = parse_http_url("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_parse_http_allowed() {
        let url = parse_http_url("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_parse_preserve_query() {
        let url = parse_http_url("https://api.test/items?category_id=7&page_no=1").unwrap();
        assert_eq!(url.query(), Some("category_id=7&page_no=1"));
    }

    #[test]
    fn test_parse_requires_scheme() {
        let result = parse_http_url("example.com");
        assert!(matches!(result, Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let result = parse_http_url("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_http_url(""), Err(UrlError::Empty)));
        assert!(matches!(parse_http_url("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace() {
        let result = parse_http_url(" https://example.com ");
        assert!(matches!(result, Err(UrlError::InvalidUrl(_))));
    }
}
