//! Remote "date modified" lookup through the DataCite JSON metadata endpoint.

use crate::error::{OsfError, Result};
use crate::http;
use serde::de::Error as _;
use serde::Deserialize;

/// The part of a DataCite record we read. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct DataciteRecord {
    #[serde(default)]
    pub dates: Vec<DataciteDate>,
}

#[derive(Debug, Deserialize)]
pub struct DataciteDate {
    /// Only the `Updated` entry must carry a date; others may omit it.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "dateType")]
    pub date_type: String,
}

const UPDATED: &str = "Updated";

/// Parses a metadata body and returns the single `Updated` date verbatim.
pub fn parse_updated_date(body: &[u8], url: &str) -> Result<String> {
    let record: DataciteRecord = serde_json::from_slice(body).map_err(|e| OsfError::Metadata {
        url: url.to_string(),
        source: e,
    })?;
    let mut updated = record
        .dates
        .into_iter()
        .filter(|d| d.date_type == UPDATED)
        .collect::<Vec<_>>();
    if updated.len() != 1 {
        return Err(OsfError::MetadataAmbiguous {
            url: url.to_string(),
            found: updated.len(),
        });
    }
    updated.remove(0).date.ok_or_else(|| OsfError::Metadata {
        url: url.to_string(),
        source: serde_json::Error::custom("Updated entry has no date"),
    })
}

/// Fetches metadata from `url` and returns its `Updated` date (`YYYY-MM-DD`, day resolution).
pub fn fetch_updated_date(url: &str) -> Result<String> {
    let body = http::get_bytes(url)?;
    let date = parse_updated_date(&body, url)?;
    tracing::info!(url, updated = %date, "remote date modified");
    Ok(date)
}
