//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Suffix appended to every cache key on disk.
pub const CACHE_FILE_SUFFIX: &str = ".html.gz";

/// Compute the cache key for a request URL.
///
/// The URL is hashed exactly as given, so two spellings of the same
/// resource are two different entries.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// File name a URL is stored under inside a cache namespace.
pub fn cache_file_name(url: &str) -> String {
    format!("{}{CACHE_FILE_SUFFIX}", compute_cache_key(url))
}
