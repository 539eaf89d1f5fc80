// Wayback Machine CDX client.
//
// The CDX API answers with a JSON array of rows; the first row is the
// header and the second is the earliest capture when `limit=1`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{ArchiveCapture, ArchiveLookup};
use crate::upstream::FetchError;

pub const DEFAULT_ARCHIVE_URL: &str = "https://web.archive.org";

pub struct WaybackClient {
    client: reqwest::Client,
    base_url: String,
}

impl WaybackClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("trustlens/0.1 (profile-risk-analysis)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ArchiveLookup for WaybackClient {
    async fn earliest_capture(&self, username: &str) -> Result<Option<ArchiveCapture>, FetchError> {
        let url = format!("{}/cdx/search/cdx", self.base_url);
        let target = format!("instagram.com/{username}");
        debug!(username = username, "CDX lookup");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("url", target.as_str()),
                ("output", "json"),
                ("limit", "1"),
                ("from", "2010"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_cdx(&body, &self.base_url, username)
    }
}

/// Turn a CDX JSON body into the earliest capture, if any.
pub fn parse_cdx(body: &str, base_url: &str, username: &str) -> Result<Option<ArchiveCapture>, FetchError> {
    // An empty body is how CDX reports "no captures".
    if body.trim().is_empty() {
        return Ok(None);
    }
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;
    let Some(timestamp) = rows.get(1).and_then(|row| row.get(1)).and_then(Value::as_str) else {
        return Ok(None);
    };
    let Some(day) = timestamp
        .get(..8)
        .filter(|d| d.chars().all(|c| c.is_ascii_digit()))
    else {
        return Err(FetchError::Parse(format!("bad CDX timestamp {timestamp:?}")));
    };

    Ok(Some(ArchiveCapture {
        date: format!("{}-{}-{}", &day[..4], &day[4..6], &day[6..8]),
        url: format!("{base_url}/web/{timestamp}/https://instagram.com/{username}"),
    }))
}
