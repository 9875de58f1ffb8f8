//! Structured data extraction from storefront HTML.
//!
//! ### Categories
//! - Matches elements against a fixed style-class selector
//!   (`span[class*='CategoryItem-sc-12a69d60-2']` by default).
//! - Reads the id attribute and the text content from the same element, so
//!   an element missing either value cannot misalign its neighbours.
//! - Strips a fixed-length prefix (`category_`, 9 characters) from ids.

pub mod categories;

pub use categories::{CategoryExtractor, extract_categories};
