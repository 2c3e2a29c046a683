//! Data models for shop profiles and search results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declarative description of how to search one retailer and read its results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopProfile {
    /// Display name for the shop
    pub shop_name: String,
    /// Search URL with a {query} placeholder
    pub search_url_template: String,
    /// Present on the page only when the search found nothing
    pub no_results_selector: String,
    /// Matches each product card in the results list
    pub items_list_selector: String,
    /// Price selector within a product card
    pub price_selector: String,
    /// Keep only the first whitespace separated token of the price text
    #[serde(default)]
    pub price_split_on_whitespace: bool,
    /// Where the display title comes from
    pub title: TitleSource,
    /// Condition the page must meet before anything is read from it
    #[serde(default)]
    pub wait_condition: Option<WaitSpec>,
    /// Cookie banner button to click if it shows up
    #[serde(default)]
    pub accept_cookies_selector: Option<String>,
}

/// The selectors producing a product title in the form `Name Quantity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    /// One element holds both name and quantity
    Combined(String),
    /// Name and quantity live in separate elements
    Split { name: String, weight: String },
}

/// A page state to wait for before extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaitSpec {
    /// At least one element matches the selector
    ElementLocated { selector: String },
    /// The first element matching the selector contains the text
    TextInElement { selector: String, text: String },
}

impl ShopProfile {
    /// Selector for a combined title element, if the profile uses one
    pub fn title_selector(&self) -> Option<&str> {
        match &self.title {
            TitleSource::Combined(selector) => Some(selector),
            TitleSource::Split { .. } => None,
        }
    }

    pub fn name_selector(&self) -> Option<&str> {
        match &self.title {
            TitleSource::Split { name, .. } => Some(name),
            TitleSource::Combined(_) => None,
        }
    }

    pub fn weight_selector(&self) -> Option<&str> {
        match &self.title {
            TitleSource::Split { weight, .. } => Some(weight),
            TitleSource::Combined(_) => None,
        }
    }

    /// Builds the search URL for a term, escaping it for use in a URL
    pub fn search_url(&self, search_term: &str) -> String {
        let encoded_term = urlencoding::encode(search_term);
        self.search_url_template.replace("{query}", &encoded_term)
    }
}

impl fmt::Display for WaitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementLocated { selector } => write!(f, "element \"{selector}\""),
            Self::TextInElement { selector, text } => {
                write!(f, "text \"{text}\" in element \"{selector}\"")
            }
        }
    }
}

/// One product row read from a results page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub title: String,
    pub price_raw: String,
    pub price_numeric: f64,
}

/// What a single shop search came back with
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Rows in document order
    Results(Vec<ResultRow>),
    /// The shop reported no matches for the term
    NoResults,
    /// The page never reached the expected state or a row was incomplete
    ExtractionFailed { reason: String },
    /// The browser or network failed
    DriverFailed { message: String },
}
