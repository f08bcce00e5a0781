use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for marketplace scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Run a search and collect every listing on the results page
    async fn scrape(&self, query: &str) -> Result<Vec<Listing>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
