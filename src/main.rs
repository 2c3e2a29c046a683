use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod drivers;
mod error;
mod executor;
mod models;
mod price;
mod price_finder;
mod profiles;
mod report;
#[cfg(test)]
mod testing;
mod traits;

use config::Config;
use drivers::{BrowserDriver, DriverKind, StaticHtmlDriver};
use price_finder::PriceFinder;
use profiles::ShopProfileRegistry;
use report::ResultPresenter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    let mut registry = ShopProfileRegistry::new();
    if let Some(path) = &config.profiles {
        registry
            .extend_from_file(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?;
    }
    registry
        .retain_shops(&config.shops)
        .context("selecting shops to search")?;

    if config.list_shops {
        for profile in registry.profiles() {
            println!("{:<16} {}", profile.shop_name, profile.search_url_template);
        }
        return Ok(());
    }

    let context = config
        .search_context()
        .context("an item to search for is required")?;
    info!(
        "Comparing prices for \"{}\" across {} shops",
        context.search_term,
        registry.profiles().len()
    );

    let finder = PriceFinder::new(
        registry.into_profiles(),
        ResultPresenter::new(config.format),
    );
    let mut stdout = std::io::stdout();

    match config.driver {
        DriverKind::Webdriver => {
            let driver =
                BrowserDriver::connect(&config.webdriver_url, &config.user_agent, !config.headed)
                    .await?;
            finder.compare(&driver, &context, &mut stdout).await
        }
        DriverKind::Http => {
            let driver = StaticHtmlDriver::new(&config.user_agent)?;
            finder.compare(&driver, &context, &mut stdout).await
        }
    }
}
