//! Client code for stockroom.
//!
//! This crate provides the HTTP fetch pipeline with its page cache, category
//! extraction, listing pagination and the report model shared by the CLI.

pub mod catalog;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod scrape;

#[cfg(test)]
mod test_support;

pub use catalog::{Category, ListingItem, ListingPage, PaginationCollector, Product};
pub use extract::{CategoryExtractor, extract_categories};
pub use fetch::{CachedFetcher, CachedPage, FetchClient, FetchConfig, FetchResponse, PageSource};
pub use report::{CategoryListing, Report};
pub use scrape::Scraper;
