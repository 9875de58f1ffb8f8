//! Page-by-page walk of the listing API for one category.

use stockroom_core::{AppConfig, Error, Namespace, render_listing_url};

use super::{ListingPage, Product};
use crate::fetch::PageSource;

/// Collects every product of a category by following `next_page`.
#[derive(Debug, Clone)]
pub struct PaginationCollector {
    template: String,
    max_pages: Option<u32>,
}

impl PaginationCollector {
    /// Create a collector for a listing URL template with `{category_id}`
    /// and `{page}` placeholders.
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into(), max_pages: None }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.listing_url_template.clone()).with_max_pages(config.max_pages)
    }

    /// Stop after `max_pages` pages even if the API reports more.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// URL of one listing page. Pages are numbered from 1.
    pub fn page_url(&self, category_id: &str, page: u32) -> String {
        render_listing_url(&self.template, category_id, page)
    }

    /// Fetch pages 1, 2, ... of `category_id` until the API reports no next
    /// page, returning all products in page order.
    ///
    /// Products on the final page are kept. A body that is not valid JSON
    /// aborts the walk with [`Error::ParseFailed`].
    pub async fn collect<S>(&self, source: &S, category_id: &str) -> Result<Vec<Product>, Error>
    where
        S: PageSource + ?Sized,
    {
        let mut products = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.page_url(category_id, page);
            let body = source.page_text(Namespace::CategoryPages, &url).await?;
            let listing = ListingPage::parse(&body).map_err(|e| Error::ParseFailed(format!("{}: {}", url, e)))?;

            let has_next = listing.has_next_page();
            let page_products = listing.into_products();
            tracing::debug!(category_id, page, count = page_products.len(), has_next, "listing page parsed");
            products.extend(page_products);

            if !has_next {
                break;
            }

            if self.max_pages.is_some_and(|max| page >= max) {
                tracing::warn!(category_id, page, "page limit reached; remaining pages skipped");
                break;
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(products)
    }
}
