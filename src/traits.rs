//! Traits and interfaces for driving a results page, independent of the backend

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::DriverError;
use crate::models::WaitSpec;

/// How often [`PageDriver::wait_until`] re-checks its condition by default
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// An element located on the current page
#[async_trait]
pub trait PageElement: Send + Sync + Sized {
    /// Visible text of the element
    async fn text(&self) -> Result<String, DriverError>;

    async fn click(&self) -> Result<(), DriverError>;

    /// Find the first descendant matching a CSS selector
    ///
    /// # Returns
    /// * `Err(DriverError::NotFound)` - Nothing inside the element matches
    async fn find(&self, selector: &str) -> Result<Self, DriverError>;
}

/// A browsing session that can load pages and query them with CSS selectors
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Element: PageElement;

    /// Load a URL, replacing the current page
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// All elements matching a selector, in document order
    async fn find_elements(&self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    /// The first element matching a selector
    ///
    /// # Returns
    /// * `Err(DriverError::NotFound)` - Nothing on the page matches
    async fn find_element(&self, selector: &str) -> Result<Self::Element, DriverError> {
        self.find_elements(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound {
                selector: selector.to_string(),
            })
    }

    /// Block until the condition holds, polling every [`WAIT_POLL_INTERVAL`]
    ///
    /// # Returns
    /// * `Err(DriverError::Timeout)` - The condition still fails after `timeout`
    async fn wait_until(&self, condition: &WaitSpec, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.condition_holds(condition).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    condition: condition.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Check a wait condition against the page once
    ///
    /// A missing element, or one re-rendered while being read, means "not yet".
    async fn condition_holds(&self, condition: &WaitSpec) -> Result<bool, DriverError> {
        let holds = match condition {
            WaitSpec::ElementLocated { selector } => self
                .find_elements(selector)
                .await
                .map(|elements| !elements.is_empty()),
            WaitSpec::TextInElement { selector, text } => match self.find_element(selector).await {
                Ok(element) => element
                    .text()
                    .await
                    .map(|found| found.contains(text.as_str())),
                Err(e) => Err(e),
            },
        };

        match holds {
            Err(DriverError::NotFound { .. } | DriverError::Stale { .. }) => Ok(false),
            other => other,
        }
    }

    /// End the session; the driver must not be used afterwards
    async fn close(&self) -> Result<(), DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixtureDriver, FixtureElement, FixturePage};

    const URL: &str = "https://shop.test/search?q=milk";

    fn header_page(text: &str) -> FixturePage {
        let mut page = FixturePage::new();
        page.insert("h1".to_string(), vec![FixtureElement::new(text)]);
        page
    }

    fn results_header() -> WaitSpec {
        WaitSpec::TextInElement {
            selector: "h1".to_string(),
            text: "search results".to_string(),
        }
    }

    #[tokio::test]
    async fn wait_keeps_polling_past_stale_element() {
        let driver = FixtureDriver::new()
            .with_page(URL, header_page("12 search results for milk"))
            .stale_for("h1", 1);
        driver.navigate(URL).await.unwrap();

        driver
            .wait_until(&results_header(), Duration::from_secs(10))
            .await
            .unwrap();

        let header_queries = driver.events().iter().filter(|e| *e == "query h1").count();
        assert_eq!(header_queries, 2);
    }

    #[tokio::test]
    async fn wait_times_out_while_element_stays_stale() {
        let driver = FixtureDriver::new()
            .with_page(URL, header_page("12 search results for milk"))
            .stale_for("h1", usize::MAX);
        driver.navigate(URL).await.unwrap();

        let err = driver
            .wait_until(&results_header(), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn stale_or_missing_element_is_not_yet() {
        let driver = FixtureDriver::new()
            .with_page(URL, header_page("loading"))
            .stale_for("h1", 1);
        driver.navigate(URL).await.unwrap();

        let located = WaitSpec::ElementLocated {
            selector: "h1".to_string(),
        };
        assert!(!driver.condition_holds(&located).await.unwrap());
        assert!(driver.condition_holds(&located).await.unwrap());
        assert!(!driver.condition_holds(&results_header()).await.unwrap());

        let missing = WaitSpec::TextInElement {
            selector: ".spinner".to_string(),
            text: "done".to_string(),
        };
        assert!(!driver.condition_holds(&missing).await.unwrap());
    }
}
