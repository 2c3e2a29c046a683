//! Page driver that fetches search pages over plain HTTP and queries the returned HTML.
//!
//! No JavaScript runs, so shops that load their results client side will look
//! empty or fail their wait condition. Useful for server rendered shops, for
//! saved pages served locally and where no WebDriver server is available.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::DriverError;
use crate::models::WaitSpec;
use crate::traits::{PageDriver, PageElement};

pub struct StaticHtmlDriver {
    client: Client,
    page: Mutex<Option<String>>,
}

impl StaticHtmlDriver {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            page: Mutex::new(None),
        })
    }

    fn set_page(&self, html: Option<String>) -> Result<(), DriverError> {
        let mut page = self
            .page
            .lock()
            .map_err(|_| DriverError::Session("page lock poisoned".to_string()))?;
        *page = html;
        Ok(())
    }
}

/// A fragment of the fetched page, owned so it can cross await points
#[derive(Debug, Clone)]
pub struct StaticElement {
    html: String,
}

fn parse_selector(selector: &str) -> Result<Selector, DriverError> {
    Selector::parse(selector).map_err(|e| DriverError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn select_all(document: &Html, selector: &Selector) -> Vec<StaticElement> {
    document
        .select(selector)
        .map(|el| StaticElement { html: el.html() })
        .collect()
}

#[async_trait]
impl PageElement for StaticElement {
    async fn text(&self) -> Result<String, DriverError> {
        let fragment = Html::parse_fragment(&self.html);
        let text = fragment.root_element().text().collect::<String>();
        Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    async fn click(&self) -> Result<(), DriverError> {
        debug!("Ignoring click on a static page");
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Self, DriverError> {
        let parsed = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        select_all(&fragment, &parsed)
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound {
                selector: selector.to_string(),
            })
    }
}

#[async_trait]
impl PageDriver for StaticHtmlDriver {
    type Element = StaticElement;

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let navigation_error = |reason: String| DriverError::Navigation {
            url: url.to_string(),
            reason,
        };

        // Drop the previous page so a failed load never leaves stale results around
        self.set_page(None)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(navigation_error(format!("HTTP {}", response.status())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        self.set_page(Some(html))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<StaticElement>, DriverError> {
        let parsed = parse_selector(selector)?;
        let page = self
            .page
            .lock()
            .map_err(|_| DriverError::Session("page lock poisoned".to_string()))?;
        let html = page
            .as_deref()
            .ok_or_else(|| DriverError::Session("no page loaded".to_string()))?;

        let document = Html::parse_document(html);
        Ok(select_all(&document, &parsed))
    }

    /// A static page never changes, so the condition is checked exactly once
    async fn wait_until(&self, condition: &WaitSpec, timeout: Duration) -> Result<(), DriverError> {
        if self.condition_holds(condition).await? {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                condition: condition.to_string(),
                waited: timeout,
            })
        }
    }

    async fn close(&self) -> Result<(), DriverError> {
        info!("Closing static HTML driver");
        self.set_page(None)
    }
}
