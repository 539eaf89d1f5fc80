// Followers risk scanner.
//
// NotAuthenticated → Fetching(page) → Scoring(page) → ... → Done | Failed
//
// Pages are fetched sequentially (the cursor of one page is needed for the
// next). Followers within a page are scored in chunks of ten, fanned out
// with buffer_unordered. A fixed delay separates pages and another follows
// every full chunk; both are pacing and always run.
//
// Cancellation keeps every follower already scored and marks the result
// `cancelled`. Authentication problems and a failed first page end the scan
// with `error_message` set instead of returning an error.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::scoring::follower::{score_follower, FollowerAnalysis, FollowerRecord, FollowerTier};
use crate::upstream::{FetchError, FollowerSource, ProfileSource, Session};

/// Followers scored between two pacing delays.
pub const CHUNK_SIZE: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub max_pages: usize,
    pub page_delay: Duration,
    pub follower_delay: Duration,
    pub concurrency: usize,
    pub as_of: NaiveDate,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_pages: 10,
            page_delay: Duration::from_millis(2000),
            follower_delay: Duration::from_millis(300),
            concurrency: 8,
            as_of: Utc::now().date_naive(),
        }
    }
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.max_pages,
            page_delay: config.page_delay,
            follower_delay: config.follower_delay,
            concurrency: config.concurrency,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    NotAuthenticated,
    ResolvingUser,
    Fetching { page: usize },
    Scoring { page: usize },
    Done,
    Failed(String),
}

/// Published on the scanner's watch channel after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub state: ScanState,
    pub pages_fetched: usize,
    pub followers_scored: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub total: usize,
    pub high_count: usize,
    pub suspicious_count: usize,
    pub normal_count: usize,
    /// Sorted by descending risk score.
    pub high_risk: Vec<FollowerAnalysis>,
    /// Sorted by descending risk score.
    pub suspicious: Vec<FollowerAnalysis>,
    pub pages_fetched: usize,
    pub cancelled: bool,
    pub error_message: Option<String>,
    /// Non-fatal problems, e.g. a later page that failed.
    pub warnings: Vec<String>,
}

impl ScanResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Partition scored followers into counts and sorted tier lists.
    pub fn from_scored(scored: Vec<FollowerAnalysis>) -> Self {
        let mut result = Self {
            total: scored.len(),
            ..Default::default()
        };
        for follower in scored {
            match follower.tier {
                FollowerTier::High => result.high_risk.push(follower),
                FollowerTier::Suspicious => result.suspicious.push(follower),
                FollowerTier::Normal => result.normal_count += 1,
            }
        }
        result.high_count = result.high_risk.len();
        result.suspicious_count = result.suspicious.len();
        for list in [&mut result.high_risk, &mut result.suspicious] {
            list.sort_by(|a, b| {
                b.risk_score
                    .cmp(&a.risk_score)
                    .then_with(|| a.username.cmp(&b.username))
            });
        }
        result
    }
}

pub struct FollowerScanner<'a> {
    followers: &'a dyn FollowerSource,
    profiles: &'a dyn ProfileSource,
    options: ScanOptions,
    progress: watch::Sender<ScanProgress>,
}

/// Why a page loop stopped early.
enum Interrupt {
    Cancelled,
    Failed(FetchError),
}

impl<'a> FollowerScanner<'a> {
    pub fn new(
        followers: &'a dyn FollowerSource,
        profiles: &'a dyn ProfileSource,
        options: ScanOptions,
    ) -> Self {
        let (progress, _) = watch::channel(ScanProgress {
            state: ScanState::NotAuthenticated,
            pages_fetched: 0,
            followers_scored: 0,
        });
        Self {
            followers,
            profiles,
            options,
            progress,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanProgress> {
        self.progress.subscribe()
    }

    fn set_state(&self, state: ScanState) {
        self.progress.send_modify(|p| p.state = state);
    }

    /// Scan the followers of the session owner, `username`. Never returns
    /// an error: failures are reported through `ScanResult::error_message`.
    pub async fn scan(
        &self,
        session: Option<&Session>,
        username: &str,
        cancel: &CancellationToken,
    ) -> ScanResult {
        let Some(session) = session else {
            return self.fail("Not authenticated: a session is required to list followers");
        };

        self.set_state(ScanState::ResolvingUser);
        let user_id = match self.resolve_owner_id(session, username).await {
            Ok(id) => id,
            Err(message) => return self.fail(message),
        };
        let session = &session.with_user_id(&user_id);

        let mut scored: Vec<FollowerAnalysis> = Vec::new();
        let mut pages_fetched = 0;
        let mut cursor: Option<String> = None;
        let mut interrupt: Option<Interrupt> = None;

        for page in 1..=self.options.max_pages.max(1) {
            if page > 1 && self.pause(self.options.page_delay, cancel).await {
                interrupt = Some(Interrupt::Cancelled);
                break;
            }

            self.set_state(ScanState::Fetching { page });
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    interrupt = Some(Interrupt::Cancelled);
                    break;
                }
                r = self.followers.fetch_followers_page(session, &user_id, cursor.as_deref()) => r,
            };
            let batch = match fetched {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(page = page, error = %e, "Follower page fetch failed");
                    interrupt = Some(Interrupt::Failed(e));
                    break;
                }
            };
            pages_fetched += 1;
            self.progress.send_modify(|p| p.pages_fetched = pages_fetched);
            debug!(page = page, count = batch.followers.len(), "Fetched follower page");

            self.set_state(ScanState::Scoring { page });
            if self.score_page(&batch.followers, &mut scored, cancel).await {
                interrupt = Some(Interrupt::Cancelled);
                break;
            }

            cursor = batch.next_cursor;
            if cursor.is_none() || batch.followers.is_empty() {
                break;
            }
        }

        let mut result = ScanResult::from_scored(scored);
        result.pages_fetched = pages_fetched;

        match interrupt {
            None => {}
            Some(Interrupt::Cancelled) => {
                info!(scored = result.total, "Scan cancelled, keeping partial results");
                result.cancelled = true;
            }
            Some(Interrupt::Failed(e)) if e.is_auth() => {
                result.error_message = Some(format!("Session rejected by upstream: {e}"));
            }
            Some(Interrupt::Failed(e)) if result.total == 0 => {
                result.error_message = Some(format!("Could not fetch any followers: {e}"));
            }
            Some(Interrupt::Failed(e)) => {
                result
                    .warnings
                    .push(format!("Stopped after page {pages_fetched}: {e}"));
            }
        }

        match &result.error_message {
            Some(message) => self.set_state(ScanState::Failed(message.clone())),
            None => self.set_state(ScanState::Done),
        }
        info!(
            total = result.total,
            high = result.high_count,
            suspicious = result.suspicious_count,
            pages = result.pages_fetched,
            "Follower scan finished"
        );
        result
    }

    /// The owner id carried by the session, or the id behind `username`
    /// when the session does not know it.
    async fn resolve_owner_id(&self, session: &Session, username: &str) -> Result<String, String> {
        if let Some(id) = session.user_id() {
            return Ok(id.to_string());
        }
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Err("Session has no user id and no username was given".to_string());
        }
        debug!(username = username, "Resolving session owner id");
        let profile = self
            .profiles
            .fetch_profile(username)
            .await
            .map_err(|e| format!("Could not resolve @{username}: {e}"))?;
        profile
            .user_id
            .ok_or_else(|| format!("Profile @{username} has no numeric id"))
    }

    /// Score one page in chunks, pausing after every full chunk.
    /// Returns true if cancelled; completed chunks are kept.
    async fn score_page(
        &self,
        records: &[FollowerRecord],
        scored: &mut Vec<FollowerAnalysis>,
        cancel: &CancellationToken,
    ) -> bool {
        let as_of = self.options.as_of;
        for chunk in records.chunks(CHUNK_SIZE) {
            if cancel.is_cancelled() {
                return true;
            }
            let results: Vec<FollowerAnalysis> = stream::iter(
                chunk
                    .iter()
                    .map(|record| async move { score_follower(record, as_of) }),
            )
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;
            scored.extend(results);
            self.progress.send_modify(|p| p.followers_scored = scored.len());

            if chunk.len() == CHUNK_SIZE && self.pause(self.options.follower_delay, cancel).await {
                return true;
            }
        }
        false
    }

    /// Sleep for `delay`; returns true if cancelled first.
    async fn pause(&self, delay: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => true,
            _ = tokio::time::sleep(delay) => false,
        }
    }

    fn fail(&self, message: impl Into<String>) -> ScanResult {
        let result = ScanResult::failed(message);
        if let Some(message) = &result.error_message {
            warn!(error = %message, "Follower scan failed");
            self.set_state(ScanState::Failed(message.clone()));
        }
        result
    }
}
