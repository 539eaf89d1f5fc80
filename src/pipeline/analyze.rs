// Single-profile analysis pipeline.
//
// 1. Fetch the profile (the only step whose failure reaches the caller)
// 2. Query contact hints, account info, archive and name search
//    concurrently, each under
//    its own timeout; failures become "unavailable" entries
// 3. Build the analysis once all producers have finished
// 4. Score trust on the assembled record

use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::archive::ArchiveLookup;
use crate::impersonation;
use crate::profile::analysis::{AnalysisBuilder, AnalyzedProfile, Signal};
use crate::scoring::trust;
use crate::upstream::{
    AccountInfoSource, ContactHintSource, FetchError, NameSearch, ProfileSource,
};

/// The collaborators an analysis may call. Optional ones are skipped when absent.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub profiles: &'a dyn ProfileSource,
    pub contacts: Option<&'a dyn ContactHintSource>,
    pub account_info: Option<&'a dyn AccountInfoSource>,
    pub archive: Option<&'a dyn ArchiveLookup>,
    pub search: Option<&'a dyn NameSearch>,
}

impl<'a> Collaborators<'a> {
    /// Profile fetch only; every network-bound sub-analysis is skipped.
    pub fn offline(profiles: &'a dyn ProfileSource) -> Self {
        Self {
            profiles,
            contacts: None,
            account_info: None,
            archive: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    /// Bound on each network sub-step.
    pub timeout: Duration,
    /// Reference date for every age computation.
    pub as_of: NaiveDate,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            as_of: Utc::now().date_naive(),
        }
    }
}

/// Run the full engine on one account.
pub async fn analyze(
    username: &str,
    collaborators: &Collaborators<'_>,
    options: &AnalyzeOptions,
) -> Result<AnalyzedProfile, FetchError> {
    let username = username.trim().trim_start_matches('@');
    info!(username = username, "Analyzing profile");

    let profile = bounded(options.timeout, collaborators.profiles.fetch_profile(username)).await?;

    let contacts = async {
        match collaborators.contacts {
            Some(source) => Some(bounded(options.timeout, source.fetch_contact_hints(username)).await),
            None => None,
        }
    };
    let account_info = async {
        match collaborators.account_info {
            Some(source) => Some(
                bounded(
                    options.timeout,
                    source.fetch_account_info(username, profile.user_id.as_deref()),
                )
                .await,
            ),
            None => None,
        }
    };
    let archive = async {
        match collaborators.archive {
            Some(source) => Some(bounded(options.timeout, source.earliest_capture(username)).await),
            None => None,
        }
    };
    let search = async {
        match (collaborators.search, impersonation::search_query(&profile)) {
            (Some(source), Some(query)) => {
                Some(bounded(options.timeout, source.search_by_name(query)).await)
            }
            _ => None,
        }
    };

    let (contacts, account_info, archive, search) =
        tokio::join!(contacts, account_info, archive, search);

    let mut builder = AnalysisBuilder::new(&profile).as_of(options.as_of);
    match contacts {
        Some(Ok(hints)) => builder = builder.with_contact_hints(hints),
        Some(Err(e)) => builder = degrade(builder, Signal::ContactHints, username, &e),
        None => {}
    }
    match account_info {
        Some(Ok(info)) => builder = builder.with_account_info(info),
        Some(Err(e)) => builder = degrade(builder, Signal::AccountInfo, username, &e),
        None => {}
    }
    match archive {
        Some(Ok(capture)) => builder = builder.with_archive(capture),
        Some(Err(e)) => builder = degrade(builder, Signal::Archive, username, &e),
        None => {}
    }
    match search {
        Some(Ok(hits)) => builder = builder.with_search_hits(hits),
        Some(Err(e)) => builder = degrade(builder, Signal::NameSearch, username, &e),
        None => {}
    }

    let analysis = builder.build();
    let trust = trust::evaluate(&profile, &analysis, options.as_of);
    info!(
        username = username,
        score = trust.score,
        verdict = %trust.verdict,
        "Analysis complete"
    );

    Ok(AnalyzedProfile {
        profile,
        analysis,
        trust,
    })
}

fn degrade<'a>(
    builder: AnalysisBuilder<'a>,
    signal: Signal,
    username: &str,
    error: &FetchError,
) -> AnalysisBuilder<'a> {
    warn!(
        username = username,
        signal = %signal,
        error = %error,
        "Signal unavailable, continuing without it"
    );
    builder.unavailable(signal, error.to_string())
}

/// Run a collaborator call under a timeout; expiry is `FetchError::Timeout`.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(FetchError::Timeout))
}
