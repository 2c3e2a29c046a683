//! WebDriver backed page driver for shops that render results with JavaScript

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, info};

use crate::error::DriverError;
use crate::traits::{PageDriver, PageElement};

/// A Chrome session controlled through a WebDriver server
pub struct BrowserDriver {
    driver: WebDriver,
}

impl BrowserDriver {
    /// Start a new Chrome session
    ///
    /// # Arguments
    /// * `webdriver_url` - Address of a running chromedriver or Selenium server
    /// * `user_agent` - Sent instead of the headless Chrome default
    /// * `headless` - Run without a visible window
    pub async fn connect(webdriver_url: &str, user_agent: &str, headless: bool) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.add_arg("--headless")?;
        }
        caps.add_arg(&format!("user-agent={user_agent}"))?;

        info!("Starting browser session via {}", webdriver_url);
        let driver = WebDriver::new(webdriver_url, caps)
            .await
            .with_context(|| format!("could not start a browser session at {webdriver_url}"))?;

        Ok(Self { driver })
    }
}

/// An element in the live browser page, with the selector that located it
pub struct BrowserElement {
    element: WebElement,
    selector: String,
}

impl BrowserElement {
    fn new(element: WebElement, selector: &str) -> Self {
        Self {
            element,
            selector: selector.to_string(),
        }
    }
}

fn classify(selector: &str, error: WebDriverError) -> DriverError {
    match error {
        WebDriverError::NoSuchElement(_) => DriverError::NotFound {
            selector: selector.to_string(),
        },
        WebDriverError::StaleElementReference(_) => DriverError::Stale {
            selector: selector.to_string(),
        },
        other => DriverError::Session(other.to_string()),
    }
}

#[async_trait]
impl PageElement for BrowserElement {
    async fn text(&self) -> Result<String, DriverError> {
        self.element
            .text()
            .await
            .map_err(|e| classify(&self.selector, e))
    }

    async fn click(&self) -> Result<(), DriverError> {
        self.element
            .click()
            .await
            .map_err(|e| classify(&self.selector, e))
    }

    async fn find(&self, selector: &str) -> Result<Self, DriverError> {
        self.element
            .find(By::Css(selector))
            .await
            .map(|element| BrowserElement::new(element, selector))
            .map_err(|e| classify(selector, e))
    }
}

#[async_trait]
impl PageDriver for BrowserDriver {
    type Element = BrowserElement;

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<BrowserElement>, DriverError> {
        let elements = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(|e| classify(selector, e))?;
        debug!("{} elements match {}", elements.len(), selector);
        Ok(elements
            .into_iter()
            .map(|element| BrowserElement::new(element, selector))
            .collect())
    }

    async fn find_element(&self, selector: &str) -> Result<BrowserElement, DriverError> {
        self.driver
            .find(By::Css(selector))
            .await
            .map(|element| BrowserElement::new(element, selector))
            .map_err(|e| classify(selector, e))
    }

    async fn close(&self) -> Result<(), DriverError> {
        info!("Closing browser session");
        self.driver
            .clone()
            .quit()
            .await
            .map_err(|e| DriverError::Session(e.to_string()))
    }
}
