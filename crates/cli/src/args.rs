//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockroom_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Storefront catalog scraper with an on-disk page cache")]
pub struct Cli {
    /// TOML config file; takes the place of STOCKROOM_CONFIG_FILE
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scrape every category and write the JSON report
    Scrape {
        #[command(flatten)]
        cache: CacheArgs,

        /// Report destination (default: ./final_output.json)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Stop each category after this many listing pages
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,
    },
    /// Print the storefront's categories as `id<TAB>name`
    Categories {
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Print the cache file a URL is stored under
    CachePath {
        /// URL exactly as it is requested
        url: String,

        /// Cache namespace: main_page or category_pages
        #[arg(long, default_value = "main_page")]
        namespace: String,

        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Layer this command's flags over the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        match self {
            Commands::Scrape { cache, output, max_pages } => {
                cache.apply(config);
                if let Some(output) = output {
                    config.output_path = output.clone();
                }
                if max_pages.is_some() {
                    config.max_pages = *max_pages;
                }
            }
            Commands::Categories { cache } => cache.apply(config),
            Commands::CachePath { cache_dir, .. } => {
                if let Some(dir) = cache_dir {
                    config.cache_dir = dir.clone();
                }
            }
        }
    }

    /// Whether the command talks to the network and needs a valid config.
    pub fn needs_validation(&self) -> bool {
        !matches!(self, Commands::CachePath { .. })
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CacheArgs {
    /// Page cache root (default: ./stockroom-cache)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Refetch every page and overwrite its cache entry
    #[arg(long)]
    pub refresh: bool,
}

impl CacheArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if self.refresh {
            config.force_refresh = true;
        }
    }
}
