//! Built-in shop profiles and the registry that orders them

use std::path::Path;

use tracing::info;

use crate::error::ProfileError;
use crate::models::{ShopProfile, TitleSource, WaitSpec};

/// The supported retailers, in report order
pub fn builtin() -> Vec<ShopProfile> {
    vec![
        ShopProfile {
            shop_name: "Tesco".to_string(),
            search_url_template: "https://www.tesco.com/groceries/en-GB/search?query={query}"
                .to_string(),
            no_results_selector: ".empty-section".to_string(),
            items_list_selector: ".product-list > li".to_string(),
            price_selector: ".price-control-wrapper".to_string(),
            price_split_on_whitespace: false,
            title: TitleSource::Combined(r#"a[data-auto="product-tile--title"]"#.to_string()),
            wait_condition: None,
            accept_cookies_selector: None,
        },
        ShopProfile {
            shop_name: "Morrisons".to_string(),
            search_url_template: "https://groceries.morrisons.com/search?entry={query}".to_string(),
            no_results_selector:
                "p[class$=noResultsFoundMessage], div[class$=resourceNotFound]".to_string(),
            items_list_selector: ".fops-shelf > li".to_string(),
            price_selector: ".fop-price".to_string(),
            price_split_on_whitespace: false,
            title: TitleSource::Combined(".fop-description".to_string()),
            wait_condition: None,
            accept_cookies_selector: None,
        },
        ShopProfile {
            shop_name: "Waitrose".to_string(),
            search_url_template: "https://www.waitrose.com/ecom/shop/search?&searchTerm={query}"
                .to_string(),
            no_results_selector: "[class^=alternativeSearch]".to_string(),
            items_list_selector: ".container-fluid > .row > article".to_string(),
            price_selector: "span[data-test=product-pod-price]".to_string(),
            price_split_on_whitespace: false,
            title: TitleSource::Combined("header".to_string()),
            wait_condition: None,
            accept_cookies_selector: Some("button[data-test=accept-all]".to_string()),
        },
        ShopProfile {
            shop_name: "Aldi".to_string(),
            search_url_template: "https://www.aldi.co.uk/search?text={query}".to_string(),
            no_results_selector: "p[class$=no-results]".to_string(),
            items_list_selector: "#products-tab .hover-item".to_string(),
            price_selector: ".category-item__price".to_string(),
            price_split_on_whitespace: true,
            title: TitleSource::Combined(".category-item__title".to_string()),
            wait_condition: None,
            accept_cookies_selector: None,
        },
        ShopProfile {
            shop_name: "Sainsbury's".to_string(),
            search_url_template:
                "https://www.sainsburys.co.uk/gol-ui/SearchDisplayView?filters[keyword]={query}"
                    .to_string(),
            no_results_selector: "div[class$=no-results]".to_string(),
            items_list_selector:
                ".ln-o-section:not(.header-fixed-subheading) li.pt-grid-item".to_string(),
            price_selector: "[data-test-id=pt-retail-price]".to_string(),
            price_split_on_whitespace: false,
            title: TitleSource::Combined("[data-test-id=product-tile-description]".to_string()),
            wait_condition: Some(WaitSpec::ElementLocated {
                selector: "[data-test-id=search-results-title]".to_string(),
            }),
            accept_cookies_selector: None,
        },
        ShopProfile {
            shop_name: "Asda".to_string(),
            search_url_template: "https://groceries.asda.com/search/{query}".to_string(),
            no_results_selector: ".no-result".to_string(),
            items_list_selector: "#main-content > main > div.search-page-content > div:nth-child(4) > div > div.co-product-list > ul li.co-item".to_string(),
            price_selector: ".co-product__price".to_string(),
            price_split_on_whitespace: false,
            title: TitleSource::Split {
                name: "[data-auto-id=linkProductTitle]".to_string(),
                weight: ".co-product__volume".to_string(),
            },
            wait_condition: Some(WaitSpec::TextInElement {
                selector: "[class^=search-content-header]".to_string(),
                text: "search results".to_string(),
            }),
            accept_cookies_selector: None,
        },
    ]
}

/// Ordered set of profiles a comparison runs over
#[derive(Debug, Clone)]
pub struct ShopProfileRegistry {
    profiles: Vec<ShopProfile>,
}

impl ShopProfileRegistry {
    /// Registry holding the built-in retailers
    pub fn new() -> Self {
        Self {
            profiles: builtin(),
        }
    }

    #[cfg(test)]
    pub fn from_profiles(profiles: Vec<ShopProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[ShopProfile] {
        &self.profiles
    }

    pub fn into_profiles(self) -> Vec<ShopProfile> {
        self.profiles
    }

    /// Append a profile after the existing ones
    pub fn register(&mut self, profile: ShopProfile) -> Result<(), ProfileError> {
        validate(&profile)?;
        self.profiles.push(profile);
        Ok(())
    }

    /// Append every profile from a JSON file holding an array of profiles
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), ProfileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profiles: Vec<ShopProfile> =
            serde_json::from_str(&contents).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Loaded {} extra shop profiles from {}",
            profiles.len(),
            path.display()
        );

        for profile in profiles {
            self.register(profile)?;
        }
        Ok(())
    }

    /// Keep only the shops named in `names`, preserving registry order
    ///
    /// Names match case-insensitively and ignore punctuation, so `sainsburys`
    /// selects `Sainsbury's`. An empty list keeps everything.
    pub fn retain_shops(&mut self, names: &[String]) -> Result<(), ProfileError> {
        if names.is_empty() {
            return Ok(());
        }

        let wanted: Vec<String> = names.iter().map(|name| shop_key(name)).collect();
        for (name, key) in names.iter().zip(&wanted) {
            if !self.profiles.iter().any(|p| shop_key(&p.shop_name) == *key) {
                return Err(ProfileError::UnknownShop {
                    name: name.clone(),
                    known: self
                        .profiles
                        .iter()
                        .map(|p| p.shop_name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }

        self.profiles
            .retain(|profile| wanted.contains(&shop_key(&profile.shop_name)));
        Ok(())
    }
}

impl Default for ShopProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn shop_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn validate(profile: &ShopProfile) -> Result<(), ProfileError> {
    let invalid = |reason: &str| ProfileError::Invalid {
        shop: profile.shop_name.clone(),
        reason: reason.to_string(),
    };

    if profile.shop_name.trim().is_empty() {
        return Err(invalid("shop name is empty"));
    }
    if !profile.search_url_template.contains("{query}") {
        return Err(invalid("search URL template has no {query} placeholder"));
    }

    let mut selectors = vec![
        &profile.no_results_selector,
        &profile.items_list_selector,
        &profile.price_selector,
    ];
    match &profile.title {
        TitleSource::Combined(title) => selectors.push(title),
        TitleSource::Split { name, weight } => selectors.extend([name, weight]),
    }
    if selectors.iter().any(|selector| selector.trim().is_empty()) {
        return Err(invalid("a required selector is empty"));
    }

    Ok(())
}
