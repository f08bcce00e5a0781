use crate::models::Listing;
use crate::scrapers::extract::ListingExtractor;
use crate::scrapers::scroll::scroll_until_stable;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::ScrapeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::Html;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Browser-based scraper for Hamrobazaar search results
pub struct HamrobazarScraper {
    config: ScrapeConfig,
}

impl HamrobazarScraper {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }
}

#[async_trait]
impl ScraperTrait for HamrobazarScraper {
    async fn scrape(&self, query: &str) -> Result<Vec<Listing>> {
        let config = self.config.clone();
        let query = query.to_string();

        // headless_chrome blocks; keep the whole session off the runtime threads
        tokio::task::spawn_blocking(move || run_session(&config, &query))
            .await
            .context("Browser task panicked")?
    }

    fn source_name(&self) -> &'static str {
        "Hamrobazaar"
    }
}

fn launch(config: &ScrapeConfig) -> Result<Browser> {
    info!("Launching Chrome (headless: {})...", config.headless);

    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .window_size(Some((1366, 900)))
        // Must outlast the longest fixed wait
        .idle_browser_timeout(Duration::from_secs(120))
        .build()
        .context("Failed to build launch options")?;

    Browser::new(options).context("Failed to launch Chrome browser")
}

/// One complete browser session: search, scroll, extract.
fn run_session(config: &ScrapeConfig, query: &str) -> Result<Vec<Listing>> {
    let extractor = ListingExtractor::new(&config.selectors)?;

    let browser = launch(config)?;
    let tab = browser.new_tab().context("Failed to open tab")?;

    info!("Opening {}...", config.base_url);
    tab.navigate_to(&config.base_url)
        .with_context(|| format!("Failed to navigate to {}", config.base_url))?;
    tab.wait_until_navigated()
        .context("Home page did not finish loading")?;
    thread::sleep(config.home_wait);

    search(&tab, config, query)?;

    info!("Scrolling to load more products...");
    let outcome = scroll_until_stable(&*tab, config.max_scrolls, config.scroll_wait)?;
    if outcome.converged {
        info!(
            "Page height settled at {} after {} scrolls",
            outcome.height, outcome.scrolls
        );
    } else {
        warn!(
            "Page still growing after {} scrolls (height {}), stopping",
            outcome.scrolls, outcome.height
        );
    }

    let html = page_html(&tab)?;
    let page_url = tab.get_url();
    debug!("Captured {} bytes of HTML from {}", html.len(), page_url);

    if let Some(dir) = &config.debug_dir {
        save_debug_artifacts(&tab, dir, &html)?;
    }

    let document = Html::parse_document(&html);
    info!("Found {} products", extractor.count_cards(&document));
    let listings = extractor.extract(&document, &page_url);

    let blank = listings.iter().filter(|l| l.is_blank()).count();
    if blank > 0 {
        warn!("{} product cards had no recognizable fields", blank);
    }

    drop(tab);
    drop(browser);
    debug!("Browser closed");

    Ok(listings)
}

fn search(tab: &Tab, config: &ScrapeConfig, query: &str) -> Result<()> {
    let selectors = &config.selectors;

    info!("Searching for {:?}...", query);
    let input = tab
        .find_element(&selectors.search_input)
        .with_context(|| format!("Search box not found ({})", selectors.search_input))?;
    let button = tab
        .find_element(&selectors.search_button)
        .with_context(|| format!("Search button not found ({})", selectors.search_button))?;

    input
        .type_into(query)
        .context("Failed to type search query")?;
    button.click().context("Failed to submit search")?;

    thread::sleep(config.results_wait);
    Ok(())
}

fn page_html(tab: &Tab) -> Result<String> {
    let result = tab
        .evaluate("document.documentElement.outerHTML", false)
        .context("Failed to read page HTML")?;

    html_from_value(result.value.as_ref())
}

fn html_from_value(value: Option<&serde_json::Value>) -> Result<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("Page HTML is not a string")
}

fn save_debug_artifacts(tab: &Tab, dir: &Path, html: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let html_path = dir.join("results_page.html");
    write_artifact(&html_path, html)?;
    info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

    let screenshot = tab
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .context("Failed to capture screenshot")?;
    let png_path = dir.join("results_page.png");
    write_artifact(&png_path, screenshot)?;
    info!("Saved screenshot to {}", png_path.display());

    Ok(())
}

fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
