use std::fs;
use std::path::Path;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::LocationRecord;

pub fn parse_locations(body: &str) -> Result<Vec<LocationRecord>> {
    let json: Value = serde_json::from_str(body)?;
    let Some(entries) = json.get("locations").and_then(Value::as_array) else {
        warn!("Document has no locations list, showing no pins");
        return Ok(Vec::new());
    };

    let locations = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if !entry.is_object() {
                warn!(index, "Skipping location that is not an object");
                return None;
            }
            match serde_json::from_value::<LocationRecord>(entry.clone()) {
                Ok(location) => Some(location),
                Err(err) => {
                    warn!(index, error = %err, "Skipping malformed location");
                    None
                }
            }
        })
        .collect();
    Ok(locations)
}

/// Fetches the document, bypassing caches. Any non-2xx status is an error.
pub async fn fetch_locations(client: &reqwest::Client, url: &str) -> Result<Vec<LocationRecord>> {
    let response = client
        .get(url)
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!(url, bytes = body.len(), "Fetched locations document");
    parse_locations(&body)
}

pub fn read_locations(path: &Path) -> Result<Vec<LocationRecord>> {
    let body = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_locations(&body)
}
