//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::drivers::DriverKind;
use crate::executor::SearchContext;
use crate::report::OutputFormat;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.50 Safari/537.36";

#[derive(Debug, Parser)]
#[command(name = "price-finder")]
#[command(about = "Compare grocery prices across UK supermarkets")]
pub struct Config {
    /// The name of the item to search for
    #[arg(required_unless_present = "list_shops")]
    pub item: Option<String>,

    /// The maximum number of items to return per shop
    #[arg(short = 'n', long, default_value_t = 10)]
    pub number_of_items: usize,

    /// Backend used to load shop pages
    #[arg(long, value_enum, env = "PRICE_FINDER_DRIVER", default_value_t = DriverKind::Webdriver)]
    pub driver: DriverKind,

    /// WebDriver server to start the browser session on
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    #[arg(long, env = "PRICE_FINDER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds to wait for shops that load results after the page
    #[arg(long, env = "PRICE_FINDER_WAIT_TIMEOUT", default_value_t = 10)]
    pub wait_timeout: u64,

    /// JSON file with extra shop profiles to search after the built-in ones
    #[arg(long, env = "PRICE_FINDER_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Only search these shops (repeatable)
    #[arg(short, long = "shop", value_name = "NAME")]
    pub shops: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the known shops and exit
    #[arg(long)]
    pub list_shops: bool,
}

impl Config {
    /// The per-search settings; `None` when no item was given
    pub fn search_context(&self) -> Option<SearchContext> {
        let item = self.item.as_ref()?;
        let mut context = SearchContext::new(item.clone(), self.number_of_items);
        context.wait_timeout = Duration::from_secs(self.wait_timeout);
        Some(context)
    }
}
