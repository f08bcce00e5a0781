mod export;
mod models;
mod scrapers;

use clap::Parser;
use scrapers::{HamrobazarScraper, ScrapeConfig, ScraperTrait};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search Hamrobazaar and save the listings to a CSV file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// What to search for
    #[arg(default_value = "samsung mobile")]
    query: String,

    /// Path to output CSV file
    #[arg(short, long, default_value = "data/hamrobazar_results.csv")]
    output: PathBuf,

    /// Maximum number of scrolls while waiting for more products
    #[arg(short, long, default_value_t = 20)]
    max_scrolls: usize,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Save the results page HTML and a screenshot here
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

impl Args {
    fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            headless: !self.headed,
            max_scrolls: self.max_scrolls,
            debug_dir: self.debug_dir.clone(),
            ..ScrapeConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let scraper = HamrobazarScraper::new(args.scrape_config());
    info!("🛒 Bazaar Scout - {} scraper", scraper.source_name());
    info!("Target: {}", scraper.config().base_url);

    // Fail before the browser session rather than after it
    export::prepare_output(&args.output)?;

    let listings = scraper.scrape(&args.query).await?;

    export::save_listings(&args.output, &listings)?;
    println!(
        "Scraping complete. {} products saved to {}",
        listings.len(),
        args.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_run() {
        let args = Args::try_parse_from(["bazaar-scout"]).unwrap();
        assert_eq!(args.query, "samsung mobile");
        assert_eq!(args.output, PathBuf::from("data/hamrobazar_results.csv"));

        let config = args.scrape_config();
        assert!(config.headless);
        assert_eq!(config.max_scrolls, 20);
        assert!(config.debug_dir.is_none());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "bazaar-scout",
            "iphone 13",
            "--output",
            "out/phones.csv",
            "--max-scrolls",
            "5",
            "--headed",
            "--debug-dir",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.query, "iphone 13");
        let config = args.scrape_config();
        assert!(!config.headless);
        assert_eq!(config.max_scrolls, 5);
        assert_eq!(config.debug_dir, Some(PathBuf::from("debug")));
    }
}
