//! End-to-end scrape: storefront page, categories, listings, report.

use std::time::Instant;

use stockroom_core::{AppConfig, Error, Namespace, PageCache};

use crate::catalog::{Category, PaginationCollector};
use crate::extract::CategoryExtractor;
use crate::fetch::{CachedFetcher, FetchClient, FetchConfig, PageSource};
use crate::report::Report;

/// Sequential scrape pipeline over a page source.
#[derive(Debug)]
pub struct Scraper<S> {
    source: S,
    storefront_url: String,
    extractor: CategoryExtractor,
    collector: PaginationCollector,
}

impl Scraper<CachedFetcher> {
    /// Build the network-backed pipeline described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from_app_config(config)?)?;
        let fetcher =
            CachedFetcher::new(client, PageCache::new(&config.cache_dir)).with_force_refresh(config.force_refresh);

        Self::with_source(fetcher, config)
    }
}

impl<S: PageSource> Scraper<S> {
    /// Build a pipeline that reads pages from `source`.
    pub fn with_source(source: S, config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            source,
            storefront_url: config.storefront_url.clone(),
            extractor: CategoryExtractor::from_config(config)?,
            collector: PaginationCollector::from_config(config),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the storefront page and extract its categories.
    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        let html = self.source.page_text(Namespace::MainPage, &self.storefront_url).await?;
        let categories = self.extractor.extract(&html);

        tracing::info!(url = %self.storefront_url, count = categories.len(), "categories extracted");
        if categories.is_empty() {
            tracing::warn!("no category elements matched; check category_selector against the storefront markup");
        }

        Ok(categories)
    }

    /// Collect every category's products, in storefront order.
    pub async fn run(&self) -> Result<Report, Error> {
        let start = Instant::now();
        let categories = self.categories().await?;
        let total = categories.len();

        let mut report = Report::new();
        for (idx, category) in categories.into_iter().enumerate() {
            let products = self.collector.collect(&self.source, &category.id).await?;
            tracing::info!(
                category = %category.name,
                id = %category.id,
                products = products.len(),
                "category {}/{} collected",
                idx + 1,
                total
            );
            report.push(category.name, products);
        }

        tracing::info!(
            categories = report.len(),
            products = report.product_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scrape finished"
        );

        Ok(report)
    }
}
