use crate::models::{Listing, COLUMNS};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write BOM, header row and one row per listing
pub fn write_listings<W: Write>(mut writer: W, listings: &[Listing]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    // Header comes from COLUMNS so an empty run still gets one
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for listing in listings {
        wtr.serialize(listing)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Make sure the directory `path` will be written into exists
pub fn prepare_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Create (or truncate) `path` and write all listings to it
pub fn save_listings(path: &Path, listings: &[Listing]) -> Result<()> {
    prepare_output(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_listings(BufWriter::new(file), listings)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, price: &str) -> Listing {
        Listing {
            title: title.to_string(),
            price: price.to_string(),
            location: "Pokhara".to_string(),
            description: "Good condition".to_string(),
            link: "https://hamrobazaar.com/item/1".to_string(),
        }
    }

    fn render(listings: &[Listing]) -> Vec<u8> {
        let mut out = Vec::new();
        write_listings(&mut out, listings).unwrap();
        out
    }

    #[test]
    fn starts_with_bom_and_header() {
        let out = render(&[]);
        assert!(out.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&out[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "Title,Price,Location,Description,Link\n");
    }

    #[test]
    fn one_row_per_listing() {
        let out = render(&[listing("Galaxy A54", "Rs. 40,000"), Listing::default()]);
        let text = std::str::from_utf8(&out[UTF8_BOM.len()..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Title,Price,Location,Description,Link");
        assert_eq!(lines[2], ",,,,");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let out = render(&[listing("Galaxy S21, 8GB", "Rs. 55,000")]);

        let mut rdr = csv::Reader::from_reader(&out[UTF8_BOM.len()..]);
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 5);
        assert_eq!(&rows[0][0], "Galaxy S21, 8GB");
        assert_eq!(&rows[0][1], "Rs. 55,000");
    }

    #[test]
    fn rows_follow_column_order() {
        let row = Listing {
            title: "Galaxy Z Flip".to_string(),
            price: "Rs. 1,10,000".to_string(),
            location: "Butwal".to_string(),
            description: "Minor scratches".to_string(),
            link: "https://hamrobazaar.com/item/5".to_string(),
        };
        let out = render(std::slice::from_ref(&row));

        let mut rdr = csv::Reader::from_reader(&out[UTF8_BOM.len()..]);
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(record.iter().collect::<Vec<_>>(), row.fields());
    }

    #[test]
    fn prepare_output_creates_missing_directories() {
        let dir = std::env::temp_dir().join(format!("bazaar-scout-prepare-{}", std::process::id()));
        let path = dir.join("data").join("results.csv");

        prepare_output(&path).unwrap();
        assert!(dir.join("data").is_dir());
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn prepare_output_fails_when_parent_is_a_file() {
        let blocker = std::env::temp_dir().join(format!("bazaar-scout-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = prepare_output(&blocker.join("results.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to create"));

        std::fs::remove_file(&blocker).unwrap();
    }

    #[test]
    fn bare_file_name_needs_no_directory() {
        prepare_output(Path::new("results.csv")).unwrap();
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("bazaar-scout-save-{}", std::process::id()));
        let path = dir.join("nested").join("results.csv");

        save_listings(&path, &[listing("Galaxy M14", "Rs. 22,000")]).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(bytes[UTF8_BOM.len()..].iter().filter(|b| **b == b'\n').count(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
