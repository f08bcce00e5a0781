use anyhow::{Context, Result};
use headless_chrome::Tab;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// A page that grows when scrolled to the bottom
pub trait ScrollablePage {
    /// Current `document.body.scrollHeight`
    fn scroll_height(&self) -> Result<u64>;

    fn scroll_to_bottom(&self) -> Result<()>;
}

impl ScrollablePage for Tab {
    fn scroll_height(&self) -> Result<u64> {
        let result = self
            .evaluate("document.body.scrollHeight", false)
            .context("Failed to read page height")?;

        result
            .value
            .as_ref()
            .and_then(|v| v.as_f64())
            .map(|h| h.max(0.0) as u64)
            .context("Page height is not a number")
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.evaluate("window.scrollTo(0, document.body.scrollHeight);", false)
            .context("Failed to scroll page")?;
        Ok(())
    }
}

/// How the scroll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Scrolls performed
    pub scrolls: usize,
    /// Last observed page height
    pub height: u64,
    /// False when the iteration cap was reached before the height settled
    pub converged: bool,
}

/// Scroll to the bottom until the page height stops changing, at most
/// `max_scrolls` times, sleeping `wait` after every scroll.
pub fn scroll_until_stable<P>(page: &P, max_scrolls: usize, wait: Duration) -> Result<ScrollOutcome>
where
    P: ScrollablePage + ?Sized,
{
    let mut last_height = page.scroll_height()?;
    debug!("Initial page height: {}", last_height);

    for i in 0..max_scrolls {
        page.scroll_to_bottom()?;
        thread::sleep(wait);

        let new_height = page.scroll_height()?;
        debug!("Scroll {}: height {} -> {}", i + 1, last_height, new_height);

        if new_height == last_height {
            return Ok(ScrollOutcome {
                scrolls: i + 1,
                height: new_height,
                converged: true,
            });
        }
        last_height = new_height;
    }

    Ok(ScrollOutcome {
        scrolls: max_scrolls,
        height: last_height,
        converged: false,
    })
}
