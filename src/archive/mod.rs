// Web-archive lookup — the earliest known capture of a profile page.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::upstream::FetchError;

pub use client::WaybackClient;

/// Earliest capture: `YYYY-MM-DD` plus a replay URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveCapture {
    pub date: String,
    pub url: String,
}

#[async_trait]
pub trait ArchiveLookup: Send + Sync {
    /// `Ok(None)` when the archive has never captured the profile.
    async fn earliest_capture(&self, username: &str) -> Result<Option<ArchiveCapture>, FetchError>;
}
