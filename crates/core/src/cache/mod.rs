//! Filesystem-backed cache for fetched page bodies.
//!
//! This module provides a persistent, content-addressed page cache:
//!
//! - Keys are the SHA-256 hex digest of the request URL
//! - Bodies are stored gzip-compressed, one file per URL
//! - Namespaces split storefront pages from listing API responses
//! - Entries never expire; only an explicit refresh overwrites them

pub mod hash;
pub mod store;

pub use crate::Error;

pub use hash::{CACHE_FILE_SUFFIX, cache_file_name, compute_cache_key};
pub use store::{Namespace, PageCache};
