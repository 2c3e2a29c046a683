//! Runs one shop search against a page driver and turns the page into result rows

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::DriverError;
use crate::models::{ResultRow, SearchOutcome, ShopProfile, TitleSource};
use crate::price::parse_price;
use crate::traits::{PageDriver, PageElement};

/// Everything a search needs besides the shop profile and the driver
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub search_term: String,
    /// Rows beyond this are ignored
    pub max_items: usize,
    /// Upper bound for a profile's wait condition
    pub wait_timeout: Duration,
}

impl SearchContext {
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(search_term: impl Into<String>, max_items: usize) -> Self {
        Self {
            search_term: search_term.into(),
            max_items,
            wait_timeout: Self::DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// Drives the navigate, wait, cookie, no-results and extract steps for a shop
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchExecutor;

impl SearchExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Search one shop. Driver faults never escape; they come back as an outcome.
    pub async fn run<D: PageDriver>(
        &self,
        profile: &ShopProfile,
        context: &SearchContext,
        driver: &D,
    ) -> SearchOutcome {
        info!(
            "Searching {} for \"{}\"",
            profile.shop_name, context.search_term
        );

        match self.search(profile, context, driver).await {
            Ok(outcome) => outcome,
            Err(DriverError::Timeout { condition, waited }) => {
                warn!(
                    "{}: gave up after {}s waiting for {}",
                    profile.shop_name,
                    waited.as_secs(),
                    condition
                );
                SearchOutcome::ExtractionFailed {
                    reason: "timeout waiting for page".to_string(),
                }
            }
            Err(e @ DriverError::NotFound { .. }) => SearchOutcome::ExtractionFailed {
                reason: e.to_string(),
            },
            Err(e) => {
                error!("{}: {}", profile.shop_name, e);
                SearchOutcome::DriverFailed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn search<D: PageDriver>(
        &self,
        profile: &ShopProfile,
        context: &SearchContext,
        driver: &D,
    ) -> Result<SearchOutcome, DriverError> {
        let url = profile.search_url(&context.search_term);
        debug!("Navigating to {}", url);
        driver.navigate(&url).await?;

        // Some shops fetch results after the page has loaded
        if let Some(condition) = &profile.wait_condition {
            debug!("Waiting for {}", condition);
            driver.wait_until(condition, context.wait_timeout).await?;
        }

        if let Some(selector) = &profile.accept_cookies_selector {
            match driver.find_element(selector).await {
                Ok(button) => button.click().await?,
                Err(DriverError::NotFound { .. }) => {
                    debug!("{}: no cookie banner", profile.shop_name);
                }
                Err(e) => return Err(e),
            }
        }

        if !driver
            .find_elements(&profile.no_results_selector)
            .await?
            .is_empty()
        {
            info!("{}: no results", profile.shop_name);
            return Ok(SearchOutcome::NoResults);
        }

        let items = driver.find_elements(&profile.items_list_selector).await?;
        debug!(
            "{}: {} items on page, reading up to {}",
            profile.shop_name,
            items.len(),
            context.max_items
        );

        let mut rows = Vec::new();
        for item in items.iter().take(context.max_items) {
            rows.push(extract_row(profile, item).await?);
        }

        info!("{}: extracted {} rows", profile.shop_name, rows.len());
        Ok(SearchOutcome::Results(rows))
    }
}

async fn extract_row<E: PageElement>(
    profile: &ShopProfile,
    item: &E,
) -> Result<ResultRow, DriverError> {
    let title = match &profile.title {
        TitleSource::Combined(selector) => child_text(item, selector).await?,
        TitleSource::Split { name, weight } => {
            let name = child_text(item, name).await?;
            let weight = child_text(item, weight).await?;
            format!("{name} {weight}")
        }
    };

    let mut price_raw = child_text(item, &profile.price_selector).await?;
    // The price element sometimes carries unit pricing after the amount
    if profile.price_split_on_whitespace {
        price_raw = price_raw
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
    }

    let price_numeric = parse_price(&price_raw);
    Ok(ResultRow {
        title,
        price_raw,
        price_numeric,
    })
}

async fn child_text<E: PageElement>(item: &E, selector: &str) -> Result<String, DriverError> {
    let text = item.find(selector).await?.text().await?;
    Ok(text.replace('\n', " ").trim().to_string())
}
