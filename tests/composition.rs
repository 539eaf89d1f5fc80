// Composition tests — the analysis pipeline end to end over in-memory
// collaborators.
//
// These tests exercise the data flow:
//   profile fetch -> contact hints / account info / archive / name search
//     -> analysis -> trust
// without any network calls. Collaborator failures and timeouts must turn
// into "unavailable" entries, never into errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use trustlens::age::AgeSource;
use trustlens::archive::{ArchiveCapture, ArchiveLookup};
use trustlens::impersonation::SearchHit;
use trustlens::output::{save_json, to_json, truncate_chars};
use trustlens::pipeline::analyze::{analyze, AnalyzeOptions, Collaborators};
use trustlens::profile::analysis::Signal;
use trustlens::profile::{AccountInfo, AccountType, ContactHints, Profile};
use trustlens::upstream::{
    AccountInfoSource, ContactHintSource, FetchError, NameSearch, ProfileSource,
};

// ============================================================
// Fakes
// ============================================================

struct Profiles(Vec<Profile>);

#[async_trait]
impl ProfileSource for Profiles {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        self.0
            .iter()
            .find(|p| p.username == username)
            .cloned()
            .ok_or(FetchError::NotFound)
    }
}

struct Hints(Result<ContactHints, FetchError>);

#[async_trait]
impl ContactHintSource for Hints {
    async fn fetch_contact_hints(&self, _username: &str) -> Result<ContactHints, FetchError> {
        self.0.clone()
    }
}

struct Info {
    result: Result<Option<AccountInfo>, FetchError>,
    /// The user id of every call.
    asked: Mutex<Vec<Option<String>>>,
}

impl Info {
    fn new(result: Result<Option<AccountInfo>, FetchError>) -> Self {
        Self {
            result,
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountInfoSource for Info {
    async fn fetch_account_info(
        &self,
        _username: &str,
        user_id: Option<&str>,
    ) -> Result<Option<AccountInfo>, FetchError> {
        self.asked.lock().unwrap().push(user_id.map(str::to_string));
        self.result.clone()
    }
}

struct Archive {
    result: Result<Option<ArchiveCapture>, FetchError>,
    delay: Duration,
}

#[async_trait]
impl ArchiveLookup for Archive {
    async fn earliest_capture(&self, _username: &str) -> Result<Option<ArchiveCapture>, FetchError> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

struct Search {
    result: Result<Vec<SearchHit>, FetchError>,
    calls: AtomicUsize,
}

impl Search {
    fn new(result: Result<Vec<SearchHit>, FetchError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NameSearch for Search {
    async fn search_by_name(&self, _query: &str) -> Result<Vec<SearchHit>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn options() -> AnalyzeOptions {
    AnalyzeOptions {
        timeout: Duration::from_secs(5),
        as_of: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
}

fn copycat() -> Profile {
    Profile {
        full_name: Some("Famous Star".to_string()),
        biography: Some("Fan page. DM me for promo".to_string()),
        profile_pic_url: Some("https://cdn.example.net/p/42.jpg".to_string()),
        profile_pic_id: Some("3000000000000000000_42".to_string()),
        follower_count: Some(900),
        following_count: Some(1_200),
        post_count: Some(4),
        ..Profile::new("famous.star.page")
    }
}

fn real_star() -> SearchHit {
    SearchHit {
        username: "realstar".to_string(),
        full_name: Some("Famous Star".to_string()),
        follower_count: 12_000_000,
        is_verified: true,
        profile_pic_id: Some("3000000000000000000_42".to_string()),
    }
}

fn capture() -> ArchiveCapture {
    ArchiveCapture {
        date: "2023-11-02".to_string(),
        url: "https://web.archive.org/web/20231102000000/https://instagram.com/famous.star.page"
            .to_string(),
    }
}

// ============================================================
// Full chain
// ============================================================

#[tokio::test]
async fn every_signal_reaches_the_trust_score() {
    let profiles = Profiles(vec![copycat()]);
    let hints = Hints(Ok(ContactHints {
        email: Some("f***r@g****.com".to_string()),
        phone: Some("+234 *** *** **12".to_string()),
        status: Some("ok".to_string()),
    }));
    let archive = Archive {
        result: Ok(Some(capture())),
        delay: Duration::ZERO,
    };
    let info = Info::new(Ok(Some(AccountInfo {
        city: Some("Lagos".to_string()),
        account_type: Some(AccountType::Creator),
        ..Default::default()
    })));
    let search = Search::new(Ok(vec![real_star()]));
    let collaborators = Collaborators {
        profiles: &profiles,
        contacts: Some(&hints),
        account_info: Some(&info),
        archive: Some(&archive),
        search: Some(&search),
    };

    let analyzed = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();
    let analysis = &analyzed.analysis;

    assert!(analysis.unavailable.is_empty());
    assert_eq!(analysis.phone.as_ref().unwrap().country.as_deref(), Some("Nigeria"));
    assert_eq!(analysis.email.as_ref().unwrap().provider.as_deref(), Some("Gmail"));
    assert_eq!(analysis.age.best.as_ref().unwrap().source, AgeSource::WebArchive);
    assert!(analysis.impersonation.as_ref().unwrap().is_impersonation);
    let details = analysis.account_info.as_ref().unwrap();
    assert_eq!(details.city.as_deref(), Some("Lagos"));
    assert_eq!(details.account_type, Some(AccountType::Creator));

    let deltas: Vec<i32> = analyzed.trust.details.iter().map(|d| d.delta).collect();
    for expected in [-30, -25, -20, -15] {
        assert!(deltas.contains(&expected), "missing {expected} in {deltas:?}");
    }
    assert_eq!(analyzed.trust.score, 0);
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn account_info_is_asked_with_the_fetched_user_id() {
    let mut subject = copycat();
    subject.user_id = Some("61000000000".to_string());
    let profiles = Profiles(vec![subject]);
    let info = Info::new(Ok(None));
    let collaborators = Collaborators {
        account_info: Some(&info),
        ..Collaborators::offline(&profiles)
    };

    let analyzed = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();
    assert_eq!(*info.asked.lock().unwrap(), vec![Some("61000000000".to_string())]);
    // Nothing public is not a failure.
    assert!(analyzed.analysis.account_info.is_none());
    assert!(!analyzed.analysis.is_unavailable(Signal::AccountInfo));
}

#[tokio::test]
async fn leading_at_sign_is_ignored() {
    let profiles = Profiles(vec![copycat()]);
    let analyzed = analyze(
        "  @famous.star.page",
        &Collaborators::offline(&profiles),
        &options(),
    )
    .await
    .unwrap();
    assert_eq!(analyzed.profile.username, "famous.star.page");
}

#[tokio::test]
async fn missing_profile_is_the_only_error() {
    let profiles = Profiles(Vec::new());
    let err = analyze("ghost", &Collaborators::offline(&profiles), &options())
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::NotFound);
}

// ============================================================
// Degradation
// ============================================================

#[tokio::test]
async fn failed_collaborators_become_unavailable_entries() {
    let profiles = Profiles(vec![copycat()]);
    let hints = Hints(Err(FetchError::RateLimited));
    let archive = Archive {
        result: Err(FetchError::Status(503)),
        delay: Duration::ZERO,
    };
    let info = Info::new(Err(FetchError::Unauthorized(401)));
    let search = Search::new(Err(FetchError::Transport("connection reset".to_string())));
    let collaborators = Collaborators {
        profiles: &profiles,
        contacts: Some(&hints),
        account_info: Some(&info),
        archive: Some(&archive),
        search: Some(&search),
    };

    let degraded = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();
    let signals: Vec<Signal> = degraded.analysis.unavailable.iter().map(|u| u.signal).collect();
    assert_eq!(
        signals,
        vec![
            Signal::ContactHints,
            Signal::AccountInfo,
            Signal::Archive,
            Signal::NameSearch
        ]
    );
    assert!(degraded.analysis.phone.is_none());
    assert!(degraded.analysis.account_info.is_none());
    assert!(degraded.analysis.impersonation.is_none());

    // Unavailable is scored exactly like "not asked".
    let offline = analyze("famous.star.page", &Collaborators::offline(&profiles), &options())
        .await
        .unwrap();
    assert!(offline.analysis.unavailable.is_empty());
    assert_eq!(degraded.trust.score, offline.trust.score);
    assert_eq!(degraded.trust.details, offline.trust.details);
}

#[tokio::test(start_paused = true)]
async fn slow_archive_times_out_without_failing() {
    let profiles = Profiles(vec![copycat()]);
    let archive = Archive {
        result: Ok(Some(capture())),
        delay: Duration::from_secs(60),
    };
    let collaborators = Collaborators {
        archive: Some(&archive),
        ..Collaborators::offline(&profiles)
    };

    let started = tokio::time::Instant::now();
    let analyzed = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(60));
    let entry = &analyzed.analysis.unavailable[0];
    assert_eq!(entry.signal, Signal::Archive);
    assert_eq!(entry.reason, "request timed out");
    assert!(analyzed.analysis.archive.is_none());
}

#[tokio::test]
async fn verified_subject_skips_name_search() {
    let mut verified = copycat();
    verified.is_verified = true;
    let profiles = Profiles(vec![verified]);
    let search = Search::new(Ok(vec![real_star()]));
    let collaborators = Collaborators {
        search: Some(&search),
        ..Collaborators::offline(&profiles)
    };

    let analyzed = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    assert!(analyzed.analysis.impersonation.is_none());
    assert!(!analyzed.analysis.is_unavailable(Signal::NameSearch));
}

// ============================================================
// Export
// ============================================================

#[tokio::test]
async fn json_export_carries_analysis_and_verdict() {
    let profiles = Profiles(vec![copycat()]);
    let archive = Archive {
        result: Err(FetchError::Timeout),
        delay: Duration::ZERO,
    };
    let collaborators = Collaborators {
        archive: Some(&archive),
        ..Collaborators::offline(&profiles)
    };
    let analyzed = analyze("famous.star.page", &collaborators, &options())
        .await
        .unwrap();

    let json = to_json(&analyzed).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["profile"]["username"], "famous.star.page");
    assert_eq!(value["analysis"]["unavailable"][0]["signal"], "archive");
    assert_eq!(value["trust"]["score"], u64::from(analyzed.trust.score));
    assert!(value["trust"]["verdict"].is_string());
    assert_eq!(value["analysis"]["reverse_image"][0]["engine"], "Google Lens");
}

#[tokio::test]
async fn avatar_gets_reverse_image_links() {
    let profiles = Profiles(vec![copycat()]);
    let analyzed = analyze("famous.star.page", &Collaborators::offline(&profiles), &options())
        .await
        .unwrap();

    let engines: Vec<&str> = analyzed
        .analysis
        .reverse_image
        .iter()
        .map(|l| l.engine.as_str())
        .collect();
    assert_eq!(engines, vec!["Google Lens", "Yandex", "TinEye", "Bing"]);
    assert_eq!(
        analyzed.analysis.reverse_image[2].url,
        "https://tineye.com/search?url=https%3A%2F%2Fcdn.example.net%2Fp%2F42.jpg"
    );

    let mut bare = copycat();
    bare.profile_pic_url = None;
    let profiles = Profiles(vec![bare]);
    let analyzed = analyze("famous.star.page", &Collaborators::offline(&profiles), &options())
        .await
        .unwrap();
    assert!(analyzed.analysis.reverse_image.is_empty());
}

#[tokio::test]
async fn saved_report_matches_the_export() {
    let profiles = Profiles(vec![copycat()]);
    let analyzed = analyze("famous.star.page", &Collaborators::offline(&profiles), &options())
        .await
        .unwrap();

    let path =
        std::env::temp_dir().join(format!("trustlens-report-{}.json", std::process::id()));
    save_json(&path, &analyzed).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(saved.trim_end(), to_json(&analyzed).unwrap());
}

#[test]
fn saving_into_a_missing_directory_names_the_path() {
    let path = std::env::temp_dir()
        .join("trustlens-no-such-dir")
        .join("report.json");
    let err = save_json(&path, &serde_json::json!({"ok": true})).unwrap_err();
    assert!(err.to_string().contains("report.json"));
}

#[test]
fn truncation_keeps_char_boundaries() {
    let bio = "Photographe à Lyon 📷 et voyageuse";
    let short = truncate_chars(bio, 20);
    assert!(short.ends_with("..."));
    assert_eq!(short.trim_end_matches("...").chars().count(), 20);
    assert!(bio.starts_with(short.trim_end_matches("...")));
}
