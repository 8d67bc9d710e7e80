use log::{debug, info};
use std::path::Path;
use url::Url;

use crate::{ScraperError, ScraperResult};

/// Reads the ordered product URL list from a headered CSV file.
///
/// Rows with a blank cell in `column` are skipped. Any row whose cell is not an absolute URL
/// fails the whole load, since a silently shorter list would shift every checkpoint index.
pub fn load_urls<P: AsRef<Path>>(path: P, column: &str) -> ScraperResult<Vec<Url>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        ScraperError::config(format!("cannot open URL source {}: {}", path.display(), e))
    })?;

    let headers = reader.headers().map_err(|e| {
        ScraperError::config(format!("cannot read header of {}: {}", path.display(), e))
    })?;
    let position = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| {
            ScraperError::config(format!(
                "column {:?} not found in {}",
                column,
                path.display()
            ))
        })?;

    let mut urls = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            ScraperError::config(format!("malformed row {} in {}: {}", row + 1, path.display(), e))
        })?;

        let cell = record.get(position).map(str::trim).unwrap_or_default();
        if cell.is_empty() {
            debug!("Skipping row {}: empty URL cell", row + 1);
            continue;
        }

        let url = Url::parse(cell).map_err(|e| {
            ScraperError::config(format!("invalid URL {:?} on row {}: {}", cell, row + 1, e))
        })?;
        urls.push(url);
    }

    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
