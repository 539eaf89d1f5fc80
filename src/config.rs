use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::archive::client::DEFAULT_ARCHIVE_URL;
use crate::upstream::Session;

pub const DEFAULT_WEB_API_URL: &str = "https://www.instagram.com";
pub const DEFAULT_MOBILE_API_URL: &str = "https://i.instagram.com";

const MIN_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 30;

/// Central configuration loaded from environment variables.
///
/// The session credential comes from env vars only (never hardcoded). The
/// .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Profile fetch base URL.
    pub web_api_url: String,
    /// Contact-hint, search and follower base URL.
    pub mobile_api_url: String,
    pub archive_url: String,
    /// Opaque session credential. Only follower scans need it.
    pub session_id: String,
    pub session_user_id: Option<String>,
    /// Bound on every network sub-step, clamped to 10–30 seconds.
    pub timeout: Duration,
    pub max_pages: usize,
    pub page_delay: Duration,
    pub follower_delay: Duration,
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load()` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let number = |key: &str, default: u64| -> Result<u64> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v
                    .parse::<u64>()
                    .with_context(|| format!("{key} must be a non-negative integer, got {v:?}")),
                _ => Ok(default),
            }
        };

        let timeout_secs =
            number("TRUSTLENS_TIMEOUT_SECS", 20)?.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        let session_user_id = lookup("TRUSTLENS_SESSION_USER_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            web_api_url: text("TRUSTLENS_WEB_API_URL", DEFAULT_WEB_API_URL),
            mobile_api_url: text("TRUSTLENS_MOBILE_API_URL", DEFAULT_MOBILE_API_URL),
            archive_url: text("TRUSTLENS_ARCHIVE_URL", DEFAULT_ARCHIVE_URL),
            session_id: text("TRUSTLENS_SESSION_ID", ""),
            session_user_id,
            timeout: Duration::from_secs(timeout_secs),
            max_pages: number("TRUSTLENS_MAX_PAGES", 10)? as usize,
            page_delay: Duration::from_millis(number("TRUSTLENS_PAGE_DELAY_MS", 2000)?),
            follower_delay: Duration::from_millis(number("TRUSTLENS_FOLLOWER_DELAY_MS", 300)?),
            concurrency: (number("TRUSTLENS_CONCURRENCY", 8)? as usize).max(1),
        })
    }

    /// The configured session, if any.
    pub fn session(&self) -> Option<Session> {
        Session::new(&self.session_id, self.session_user_id.as_deref())
    }

}
