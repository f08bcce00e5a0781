use std::path::PathBuf;
use std::time::Duration;

/// CSS selectors describing the marketplace DOM
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// Search box on the home page
    pub search_input: String,
    /// Button submitting the search
    pub search_button: String,
    /// One product card on the results page
    pub card: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub description: String,
    /// Anchor inside the card; its `href` becomes the link
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            search_input: r#"input[name="searchValue"]"#.to_string(),
            search_button: ".nav-searchbar-input-searchIcon".to_string(),
            card: "div.card-product-linear-info".to_string(),
            title: "h2.product-title".to_string(),
            price: "div.productPrice".to_string(),
            location: "span.location".to_string(),
            description: "p.description".to_string(),
            link: "a.card-link".to_string(),
        }
    }
}

/// Settings for one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Marketplace home page
    pub base_url: String,
    /// Run Chrome without a window
    pub headless: bool,
    /// Pause after the home page loads
    pub home_wait: Duration,
    /// Pause after submitting the search
    pub results_wait: Duration,
    /// Pause after each scroll
    pub scroll_wait: Duration,
    /// Upper bound on scroll iterations
    pub max_scrolls: usize,
    pub selectors: ListingSelectors,
    /// Where to dump page HTML and a screenshot, if anywhere
    pub debug_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hamrobazaar.com/".to_string(),
            headless: true,
            home_wait: Duration::from_secs(3),
            results_wait: Duration::from_secs(5),
            scroll_wait: Duration::from_secs(3),
            max_scrolls: 20,
            selectors: ListingSelectors::default(),
            debug_dir: None,
        }
    }
}
