pub mod extract;
pub mod hamrobazar;
pub mod scroll;
pub mod traits;
pub mod types;

pub use hamrobazar::HamrobazarScraper;
pub use traits::ScraperTrait;
pub use types::ScrapeConfig;
