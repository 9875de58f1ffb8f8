//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, CATEGORY_ID_PLACEHOLDER, PAGE_PLACEHOLDER, render_listing_url};
use thiserror::Error;
use url::Url;

/// HTTP methods accepted for `http_method`.
pub const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
    })
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `storefront_url` or `listing_url_template`
    /// is empty, and `ConfigError::Invalid` if:
    /// - either URL does not parse as an http(s) URL with a host
    /// - `listing_url_template` lacks the `{category_id}` or `{page}` placeholder
    /// - `http_method` is not a known method
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `category_selector` is empty
    /// - `max_pages` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storefront_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "storefront_url".into(),
                hint: "Set STOCKROOM_STOREFRONT_URL or storefront_url in the config file".into(),
            });
        }
        if !is_http_url(&self.storefront_url) {
            return Err(invalid("storefront_url", "must be an http(s) URL"));
        }

        if self.listing_url_template.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "listing_url_template".into(),
                hint: "Set STOCKROOM_LISTING_URL_TEMPLATE or listing_url_template in the config file".into(),
            });
        }
        if !is_http_url(&render_listing_url(&self.listing_url_template, "0", 1)) {
            return Err(invalid("listing_url_template", "must be an http(s) URL once placeholders are filled"));
        }
        if !self.listing_url_template.contains(CATEGORY_ID_PLACEHOLDER) {
            return Err(invalid("listing_url_template", "must contain the {category_id} placeholder"));
        }
        if !self.listing_url_template.contains(PAGE_PLACEHOLDER) {
            return Err(invalid("listing_url_template", "must contain the {page} placeholder"));
        }

        if !HTTP_METHODS.contains(&self.http_method.as_str()) {
            return Err(invalid("http_method", "must be an upper-case HTTP method such as GET"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.category_selector.trim().is_empty() {
            return Err(invalid("category_selector", "must not be empty"));
        }

        if self.max_pages == Some(0) {
            return Err(invalid("max_pages", "must be greater than 0 when set"));
        }

        if self.force_refresh {
            tracing::warn!(
                cache_dir = %self.cache_dir.display(),
                "force_refresh is set; existing cache entries will be overwritten"
            );
        }

        Ok(())
    }
}
