//! stockroom command-line entry point.
//!
//! Logging goes to stderr so the `categories` and `cache-path` output on
//! stdout can be piped.

use anyhow::{Context, Result};
use clap::Parser;
use stockroom_client::Scraper;
use stockroom_core::{AppConfig, Namespace, PageCache};
use tracing_subscriber::EnvFilter;

mod args;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.command.apply(&mut config);
    if cli.command.needs_validation() {
        config.validate()?;
    }

    match cli.command {
        Commands::Scrape { .. } => {
            tracing::info!(
                storefront = %config.storefront_url,
                cache_dir = %config.cache_dir.display(),
                "starting scrape"
            );

            let report = Scraper::from_config(&config)?.run().await?;
            report.write_to(&config.output_path)?;

            println!(
                "Wrote {} categories ({} products) to {}",
                report.len(),
                report.product_count(),
                config.output_path.display()
            );
        }
        Commands::Categories { .. } => {
            for category in Scraper::from_config(&config)?.categories().await? {
                println!("{}\t{}", category.id, category.name);
            }
        }
        Commands::CachePath { url, namespace, .. } => {
            let namespace: Namespace = namespace.parse()?;
            println!("{}", PageCache::new(config.cache_dir).path_for(namespace, &url).display());
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
