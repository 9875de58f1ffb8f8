//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STOCKROOM_*)
//! 2. TOML config file (`--config` or STOCKROOM_CONFIG_FILE)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, HTTP_METHODS};

/// Placeholder substituted with the category id in the listing template.
pub const CATEGORY_ID_PLACEHOLDER: &str = "{category_id}";

/// Placeholder substituted with the 1-based page number in the listing template.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Substitute both placeholders of a listing URL template.
///
/// The page number is filled in first so a category id that happens to
/// contain `{page}` is left as written.
pub fn render_listing_url(template: &str, category_id: &str, page: u32) -> String {
    template
        .replace(PAGE_PLACEHOLDER, &page.to_string())
        .replace(CATEGORY_ID_PLACEHOLDER, category_id)
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STOCKROOM_*)
/// 2. TOML config file
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storefront page the category list is scraped from.
    ///
    /// Set via STOCKROOM_STOREFRONT_URL environment variable.
    #[serde(default = "default_storefront_url")]
    pub storefront_url: String,

    /// Listing API URL with `{category_id}` and `{page}` placeholders.
    ///
    /// Set via STOCKROOM_LISTING_URL_TEMPLATE environment variable.
    #[serde(default = "default_listing_url_template")]
    pub listing_url_template: String,

    /// Root directory of the page cache.
    ///
    /// Set via STOCKROOM_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Where the JSON report is written.
    ///
    /// Set via STOCKROOM_OUTPUT_PATH environment variable.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// HTTP method used for every request.
    ///
    /// Set via STOCKROOM_HTTP_METHOD environment variable.
    #[serde(default = "default_http_method")]
    pub http_method: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via STOCKROOM_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via STOCKROOM_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// CSS selector matching category elements on the storefront page.
    ///
    /// Set via STOCKROOM_CATEGORY_SELECTOR environment variable.
    #[serde(default = "default_category_selector")]
    pub category_selector: String,

    /// Number of leading characters stripped from a category element id.
    ///
    /// Set via STOCKROOM_CATEGORY_ID_PREFIX_LEN environment variable.
    #[serde(default = "default_category_id_prefix_len")]
    pub category_id_prefix_len: usize,

    /// Upper bound on listing pages fetched per category. Unbounded when unset.
    ///
    /// Set via STOCKROOM_MAX_PAGES environment variable.
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Ignore existing cache entries and overwrite them with fresh responses.
    ///
    /// Set via STOCKROOM_FORCE_REFRESH environment variable.
    #[serde(default)]
    pub force_refresh: bool,
}

fn default_storefront_url() -> String {
    "https://shaktitoolsandhardwarestore.com/".into()
}

fn default_listing_url_template() -> String {
    "https://api.dotshowroom.in/api/dotk/catalog/getItemsBasicDetails/1015404\
     ?category_id={category_id}&category_type=0&page_no={page}"
        .into()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./stockroom-cache")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./final_output.json")
}

fn default_http_method() -> String {
    "GET".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:106.0) Gecko/20100101 Firefox/106.0".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_category_selector() -> String {
    "span[class*='CategoryItem-sc-12a69d60-2']".into()
}

fn default_category_id_prefix_len() -> usize {
    9
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storefront_url: default_storefront_url(),
            listing_url_template: default_listing_url_template(),
            cache_dir: default_cache_dir(),
            output_path: default_output_path(),
            http_method: default_http_method(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            category_selector: default_category_selector(),
            category_id_prefix_len: default_category_id_prefix_len(),
            max_pages: None,
            force_refresh: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Listing API URL for one page of one category.
    pub fn listing_url(&self, category_id: &str, page: u32) -> String {
        render_listing_url(&self.listing_url_template, category_id, page)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `STOCKROOM_`
    /// 2. TOML file from `config_file`, else from `STOCKROOM_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// The result is not validated. Callers apply their own overrides and
    /// then call [`AppConfig::validate`] once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::LoadFailed(format!("config file not found: {}", path.display())));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Ok(config_path) = std::env::var("STOCKROOM_CONFIG_FILE") {
                    figment = figment.merge(Toml::file(&config_path));
                }
            }
        }

        figment = figment.merge(
            Env::prefixed("STOCKROOM_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))
    }
}
