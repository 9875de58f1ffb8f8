//! Unified error types for stockroom.
//!
//! Every variant renders with a stable upper-case code prefix so log lines
//! can be grepped by failure class.

/// Unified error type shared by the fetch, cache, extract and report layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown cache namespace).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Server answered with a non-success status.
    #[error("HTTP_ERROR: status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Network or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Page cache read, write or compression failure.
    #[error("CACHE_ERROR: {0}")]
    CacheError(String),

    /// Category extraction failed.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Listing response was not valid JSON.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Report could not be serialized or written.
    #[error("REPORT_ERROR: {0}")]
    ReportError(String),
}

impl Error {
    /// Stable code for the failure class, without the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::HttpStatus { .. } | Error::HttpError(_) => "HTTP_ERROR",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::CacheError(_) => "CACHE_ERROR",
            Error::ExtractFailed(_) => "EXTRACT_FAILED",
            Error::ParseFailed(_) => "PARSE_FAILED",
            Error::ReportError(_) => "REPORT_ERROR",
        }
    }
}
