use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::executor::{SearchContext, SearchExecutor};
use crate::models::ShopProfile;
use crate::report::ResultPresenter;
use crate::traits::PageDriver;

/// Runs a search term across every shop profile and writes one section per shop
pub struct PriceFinder {
    profiles: Vec<ShopProfile>,
    executor: SearchExecutor,
    presenter: ResultPresenter,
}

impl PriceFinder {
    pub fn new(profiles: Vec<ShopProfile>, presenter: ResultPresenter) -> Self {
        Self {
            profiles,
            executor: SearchExecutor::new(),
            presenter,
        }
    }

    /// Search every shop in order, then close the driver.
    ///
    /// A failing shop only affects its own section. The driver is closed once,
    /// after the last shop, even when writing the report fails.
    pub async fn compare<D: PageDriver, W: Write>(
        &self,
        driver: &D,
        context: &SearchContext,
        out: &mut W,
    ) -> Result<()> {
        let result = self.search_all(driver, context, out).await;

        if let Err(e) = driver.close().await {
            warn!("Failed to close page driver: {}", e);
        }

        result
    }

    async fn search_all<D: PageDriver, W: Write>(
        &self,
        driver: &D,
        context: &SearchContext,
        out: &mut W,
    ) -> Result<()> {
        for profile in &self.profiles {
            let outcome = self.executor.run(profile, context, driver).await;
            let section = self
                .presenter
                .render(&profile.shop_name, &context.search_term, &outcome);
            writeln!(out, "{section}").context("failed to write report")?;
            out.flush().context("failed to write report")?;
        }

        info!("Searched {} shops", self.profiles.len());
        Ok(())
    }
}
