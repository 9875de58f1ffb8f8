//! Category harvesting from the storefront page.

use scraper::{ElementRef, Html, Selector};
use stockroom_core::{AppConfig, Error};

use crate::catalog::Category;

/// Finds category elements with a fixed selector and reads each one's id
/// and name from the element itself.
#[derive(Debug, Clone)]
pub struct CategoryExtractor {
    selector: Selector,
    id_prefix_len: usize,
}

impl CategoryExtractor {
    /// Build an extractor from a CSS selector and the number of leading
    /// characters to strip from each element id.
    pub fn new(selector: &str, id_prefix_len: usize) -> Result<Self, Error> {
        let selector =
            Selector::parse(selector).map_err(|e| Error::ExtractFailed(format!("invalid selector {selector:?}: {e}")))?;

        Ok(Self { selector, id_prefix_len })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.category_selector, config.category_id_prefix_len)
    }

    /// Extract categories in document order.
    ///
    /// Elements without an id, or whose id is no longer than the prefix, are
    /// skipped.
    pub fn extract(&self, html: &str) -> Vec<Category> {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .filter_map(|element| self.category_of(element))
            .collect()
    }

    fn category_of(&self, element: ElementRef<'_>) -> Option<Category> {
        let Some(raw_id) = element.value().id() else {
            tracing::debug!("skipping category element without id: {}", element.html());
            return None;
        };

        let id: String = raw_id.chars().skip(self.id_prefix_len).collect();
        if id.is_empty() {
            tracing::debug!("skipping category element with short id {:?}", raw_id);
            return None;
        }

        let name = element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");

        Some(Category { id, name })
    }
}

/// Extract categories with a one-off extractor.
pub fn extract_categories(html: &str, selector: &str, id_prefix_len: usize) -> Result<Vec<Category>, Error> {
    Ok(CategoryExtractor::new(selector, id_prefix_len)?.extract(html))
}
