//! In-memory page driver for tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::DriverError;
use crate::traits::{PageDriver, PageElement};

#[derive(Debug, Clone, Default)]
pub struct FixtureElement {
    text: String,
    children: HashMap<String, FixtureElement>,
    clicks: Arc<AtomicUsize>,
}

impl FixtureElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// A product card with `.title` and `.price` children
    pub fn item(title: &str, price: &str) -> Self {
        Self::default()
            .with_child(".title", Self::new(title))
            .with_child(".price", Self::new(price))
    }

    pub fn with_child(mut self, selector: &str, child: FixtureElement) -> Self {
        self.children.insert(selector.to_string(), child);
        self
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageElement for FixtureElement {
    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.text.clone())
    }

    async fn click(&self) -> Result<(), DriverError> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Self, DriverError> {
        self.children
            .get(selector)
            .cloned()
            .ok_or_else(|| DriverError::NotFound {
                selector: selector.to_string(),
            })
    }
}

/// Elements keyed by the selector that finds them
pub type FixturePage = HashMap<String, Vec<FixtureElement>>;

/// Serves canned pages per URL and records everything asked of it
#[derive(Debug, Default)]
pub struct FixtureDriver {
    pages: HashMap<String, FixturePage>,
    failing_urls: HashSet<String>,
    stale_reads: Mutex<HashMap<String, usize>>,
    current: Mutex<Option<String>>,
    events: Mutex<Vec<String>>,
}

impl FixtureDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FixturePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn fail_navigation(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    /// The next `reads` queries for `selector` fail as if the element was re-rendered
    pub fn stale_for(self, selector: &str, reads: usize) -> Self {
        self.stale_reads
            .lock()
            .unwrap()
            .insert(selector.to_string(), reads);
        self
    }

    /// `navigate <url>`, `query <selector>` and `close` entries in call order
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn queried(&self, selector: &str) -> bool {
        self.events().contains(&format!("query {selector}"))
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl PageDriver for FixtureDriver {
    type Element = FixtureElement;

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.record(format!("navigate {url}"));
        if self.failing_urls.contains(url) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<FixtureElement>, DriverError> {
        self.record(format!("query {selector}"));
        if let Some(remaining) = self.stale_reads.lock().unwrap().get_mut(selector)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(DriverError::Stale {
                selector: selector.to_string(),
            });
        }
        let current = self.current.lock().unwrap().clone();
        Ok(current
            .and_then(|url| self.pages.get(&url))
            .and_then(|page| page.get(selector))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.record("close".to_string());
        Ok(())
    }
}
