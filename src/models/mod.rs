use serde::Serialize;

/// Column names of the exported file, in order
pub const COLUMNS: [&str; 5] = ["Title", "Price", "Location", "Description", "Link"];

/// One product entry from a marketplace search results page.
///
/// Every field is the raw text shown on the card; a field whose element was
/// missing is an empty string. Serializes as one row in `COLUMNS` order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub price: String,
    pub location: String,
    pub description: String,
    pub link: String,
}

impl Listing {
    /// True when no field could be extracted from the card
    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }

    /// Field values in column order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.title,
            &self.price,
            &self.location,
            &self.description,
            &self.link,
        ]
    }
}
