//! Page driver backends

mod browser;
mod static_html;

pub use browser::BrowserDriver;
pub use static_html::StaticHtmlDriver;

use clap::ValueEnum;

/// Which backend loads the shop pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DriverKind {
    /// Headless Chrome through a WebDriver server
    #[default]
    Webdriver,
    /// Plain HTTP fetch without JavaScript
    Http,
}
