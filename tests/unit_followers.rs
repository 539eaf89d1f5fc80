// Unit tests for the reduced follower scorer and the follower scanner.
//
// The scanner runs against in-memory collaborators that serve queued pages
// and record every cursor they were asked for.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use trustlens::age::AgeBand;
use trustlens::pipeline::followers::{
    FollowerScanner, ScanOptions, ScanResult, ScanState, CHUNK_SIZE,
};
use trustlens::profile::Profile;
use trustlens::scoring::follower::{score_follower, FollowerRecord, FollowerTier};
use trustlens::upstream::{FetchError, FollowerPage, FollowerSource, ProfileSource, Session};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn with_picture(username: &str, name: Option<&str>) -> FollowerRecord {
    FollowerRecord {
        username: username.to_string(),
        full_name: name.map(str::to_string),
        profile_pic_url: Some("https://cdn.example.net/p/1.jpg".to_string()),
        ..Default::default()
    }
}

/// No picture, no name, digit-heavy and private: 75 points.
fn bot(n: usize) -> FollowerRecord {
    FollowerRecord {
        username: format!("user{:08}", 83_726_400 + n),
        is_private: true,
        has_anonymous_profile_picture: true,
        ..Default::default()
    }
}

fn friend(n: usize) -> FollowerRecord {
    with_picture(&format!("friend{n}"), Some("Jane Doe"))
}

fn page(followers: Vec<FollowerRecord>, next: Option<&str>) -> Result<FollowerPage, FetchError> {
    Ok(FollowerPage {
        followers,
        next_cursor: next.map(str::to_string),
    })
}

// ============================================================
// Fakes
// ============================================================

struct QueuedFollowers {
    pages: Mutex<VecDeque<Result<FollowerPage, FetchError>>>,
    /// (user_id, cursor) of every call.
    calls: Mutex<Vec<(String, Option<String>)>>,
    /// Owner id carried by the session of every call.
    owners: Mutex<Vec<Option<String>>>,
    /// Cancel this token when the given call number (1-based) arrives.
    cancel_on: Option<(usize, CancellationToken)>,
}

impl QueuedFollowers {
    fn new(pages: Vec<Result<FollowerPage, FetchError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            calls: Mutex::new(Vec::new()),
            owners: Mutex::new(Vec::new()),
            cancel_on: None,
        }
    }

    fn cancelling_on(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on = Some((call, token));
        self
    }

    fn cursors(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    fn user_ids(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }
}

#[async_trait]
impl FollowerSource for QueuedFollowers {
    async fn fetch_followers_page(
        &self,
        session: &Session,
        user_id: &str,
        cursor: Option<&str>,
    ) -> Result<FollowerPage, FetchError> {
        self.owners
            .lock()
            .unwrap()
            .push(session.user_id().map(str::to_string));
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((user_id.to_string(), cursor.map(str::to_string)));
            calls.len()
        };
        if let Some((at, token)) = &self.cancel_on {
            if *at == call {
                token.cancel();
            }
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| page(Vec::new(), None))
    }
}

struct Profiles;

#[async_trait]
impl ProfileSource for Profiles {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        match username {
            "target" => Ok(Profile {
                user_id: Some("555".to_string()),
                ..Profile::new("target")
            }),
            "no_id" => Ok(Profile::new("no_id")),
            _ => Err(FetchError::NotFound),
        }
    }
}

fn session() -> Session {
    Session::new("sessionid-abc", Some("1")).unwrap()
}

fn quick() -> ScanOptions {
    ScanOptions {
        page_delay: Duration::ZERO,
        follower_delay: Duration::ZERO,
        as_of: as_of(),
        ..Default::default()
    }
}

async fn run(source: &QueuedFollowers, options: ScanOptions) -> ScanResult {
    let scanner = FollowerScanner::new(source, &Profiles, options);
    scanner
        .scan(Some(&session()), "owner", &CancellationToken::new())
        .await
}

// ============================================================
// Scorer
// ============================================================

#[test]
fn verified_follower_is_always_normal() {
    let mut record = bot(1);
    record.is_verified = true;
    let result = score_follower(&record, as_of());
    assert_eq!(result.risk_score, 0);
    assert_eq!(result.tier, FollowerTier::Normal);
    assert!(result.flags.is_empty());
}

#[test]
fn faceless_numeric_private_account_is_high() {
    let result = score_follower(&bot(1), as_of());
    assert_eq!(result.risk_score, 75);
    assert_eq!(result.tier, FollowerTier::High);
    assert_eq!(result.flags.len(), 4);
}

#[test]
fn spam_keyword_in_name() {
    let result = score_follower(&with_picture("signals", Some("Crypto Signals")), as_of());
    assert_eq!(result.risk_score, 25);
    assert_eq!(result.tier, FollowerTier::Normal);
    assert!(result.flags.iter().any(|f| f.ends_with("crypto")));
}

#[test]
fn new_account_adds_points() {
    let mut record = with_picture("a_b_c", None);
    record.user_id = Some("99999999999".to_string());
    let result = score_follower(&record, as_of());
    assert_eq!(result.age_band, Some(AgeBand::UnderOne));
    // No name 15, underscores 10, new account 10.
    assert_eq!(result.risk_score, 35);
    assert_eq!(result.tier, FollowerTier::Suspicious);
}

#[test]
fn id_past_every_checkpoint_stays_new_years_later() {
    let mut record = with_picture("a_b_c", None);
    record.user_id = Some("90000000000".to_string());
    let later = NaiveDate::from_ymd_opt(2027, 3, 1).unwrap();
    let result = score_follower(&record, later);
    assert_eq!(result.age_band, Some(AgeBand::UnderOne));
    assert_eq!(result.risk_score, 35);
}

#[test]
fn score_is_capped_at_100() {
    let record = FollowerRecord {
        username: "x__y__1234".to_string(),
        full_name: Some("Crypto Giveaway".to_string()),
        is_private: true,
        user_id: Some("99999999999".to_string()),
        ..Default::default()
    };
    let result = score_follower(&record, as_of());
    assert_eq!(result.risk_score, 100);
    assert_eq!(result.tier, FollowerTier::High);
}

#[test]
fn tier_boundaries() {
    assert_eq!(FollowerTier::from_score(29), FollowerTier::Normal);
    assert_eq!(FollowerTier::from_score(30), FollowerTier::Suspicious);
    assert_eq!(FollowerTier::from_score(49), FollowerTier::Suspicious);
    assert_eq!(FollowerTier::from_score(50), FollowerTier::High);
}

#[test]
fn tier_lists_sort_by_score_then_username() {
    let mut faceless = bot(2);
    faceless.is_private = false; // 60
    let scored = vec![
        score_follower(&faceless, as_of()),
        score_follower(&bot(9), as_of()),
        score_follower(&bot(3), as_of()),
        score_follower(&friend(1), as_of()),
    ];
    let result = ScanResult::from_scored(scored);
    assert_eq!(result.total, 4);
    assert_eq!(result.normal_count, 1);
    let order: Vec<(u8, &str)> = result
        .high_risk
        .iter()
        .map(|f| (f.risk_score, f.username.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(75, "user83726403"), (75, "user83726409"), (60, "user83726402")]
    );
}

// ============================================================
// Scanner — authentication and target resolution
// ============================================================

#[tokio::test]
async fn no_session_is_reported_not_raised() {
    let source = QueuedFollowers::new(vec![page(vec![bot(1)], None)]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let progress = scanner.subscribe();
    let result = scanner
        .scan(None, "owner", &CancellationToken::new())
        .await;

    assert!(result.error_message.unwrap().starts_with("Not authenticated"));
    assert_eq!(result.total, 0);
    assert!(source.cursors().is_empty());
    assert!(matches!(progress.borrow().state, ScanState::Failed(_)));
}

#[tokio::test]
async fn known_owner_id_skips_the_profile_lookup() {
    let source = QueuedFollowers::new(vec![page(vec![friend(1)], None)]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    // "ghost" does not resolve, so any lookup would fail the scan.
    let result = scanner
        .scan(Some(&session()), "ghost", &CancellationToken::new())
        .await;
    assert_eq!(result.error_message, None);
    assert_eq!(source.user_ids(), vec!["1".to_string()]);
}

#[tokio::test]
async fn anonymous_session_resolves_the_owner_id() {
    let source = QueuedFollowers::new(vec![
        page(vec![friend(1)], Some("c1")),
        page(vec![bot(1)], None),
    ]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let anonymous = Session::new("sessionid-abc", None).unwrap();
    let result = scanner
        .scan(Some(&anonymous), "@target", &CancellationToken::new())
        .await;

    assert_eq!(result.error_message, None);
    assert_eq!(result.total, 2);
    assert_eq!(source.user_ids(), vec!["555".to_string(), "555".to_string()]);
    // Every page request carries a session bound to the resolved owner.
    assert_eq!(
        *source.owners.lock().unwrap(),
        vec![Some("555".to_string()), Some("555".to_string())]
    );
}

#[tokio::test]
async fn unresolvable_owner_is_reported() {
    let source = QueuedFollowers::new(Vec::new());
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let anonymous = Session::new("sessionid-abc", None).unwrap();
    let cancel = CancellationToken::new();

    let missing = scanner.scan(Some(&anonymous), "ghost", &cancel).await;
    assert!(missing.error_message.unwrap().contains("@ghost"));

    let no_id = scanner.scan(Some(&anonymous), "no_id", &cancel).await;
    assert!(no_id.error_message.unwrap().contains("no numeric id"));

    let blank = scanner.scan(Some(&anonymous), "  ", &cancel).await;
    assert!(blank.error_message.unwrap().contains("no username"));
    assert!(source.cursors().is_empty());
}

// ============================================================
// Scanner — pagination and failures
// ============================================================

#[tokio::test]
async fn follows_cursors_until_the_last_page() {
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1), friend(1)], Some("c1")),
        page(vec![bot(2)], Some("c2")),
        page(vec![friend(2)], None),
    ]);
    let result = run(&source, quick()).await;

    assert_eq!(
        source.cursors(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
    assert_eq!(result.pages_fetched, 3);
    assert_eq!(result.total, 4);
    assert_eq!(result.high_count, 2);
    assert_eq!(result.normal_count, 2);
    assert_eq!(result.high_count + result.suspicious_count + result.normal_count, result.total);
    assert!(!result.cancelled);
}

#[tokio::test]
async fn stops_at_max_pages() {
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1)], Some("c1")),
        page(vec![bot(2)], Some("c2")),
        page(vec![bot(3)], Some("c3")),
    ]);
    let result = run(&source, ScanOptions { max_pages: 2, ..quick() }).await;
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(result.total, 2);
    assert_eq!(source.cursors().len(), 2);
}

#[tokio::test]
async fn empty_page_ends_the_scan() {
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1)], Some("c1")),
        page(Vec::new(), Some("c2")),
        page(vec![bot(2)], None),
    ]);
    let result = run(&source, quick()).await;
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(result.total, 1);
}

#[tokio::test]
async fn first_page_failure_sets_error() {
    let source = QueuedFollowers::new(vec![Err(FetchError::Status(500))]);
    let result = run(&source, quick()).await;
    assert!(result
        .error_message
        .unwrap()
        .starts_with("Could not fetch any followers"));
    assert_eq!(result.total, 0);
    assert_eq!(result.high_count + result.suspicious_count + result.normal_count, 0);
}

#[tokio::test]
async fn auth_failure_mid_scan_keeps_scored_followers() {
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1), friend(1)], Some("c1")),
        Err(FetchError::Unauthorized(401)),
    ]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let progress = scanner.subscribe();
    let result = scanner
        .scan(Some(&session()), "owner", &CancellationToken::new())
        .await;

    assert!(result.error_message.unwrap().contains("HTTP 401"));
    assert_eq!(result.total, 2);
    assert_eq!(result.pages_fetched, 1);
    assert!(matches!(progress.borrow().state, ScanState::Failed(_)));
}

#[tokio::test]
async fn later_page_failure_is_a_warning() {
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1)], Some("c1")),
        Err(FetchError::RateLimited),
    ]);
    let result = run(&source, quick()).await;
    assert_eq!(result.error_message, None);
    assert_eq!(result.total, 1);
    assert_eq!(
        result.warnings,
        vec!["Stopped after page 1: rate limited (HTTP 429)".to_string()]
    );
}

#[tokio::test]
async fn progress_ends_in_done() {
    let source = QueuedFollowers::new(vec![page((0..12).map(friend).collect(), None)]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let progress = scanner.subscribe();
    let result = scanner
        .scan(Some(&session()), "owner", &CancellationToken::new())
        .await;

    let last = progress.borrow().clone();
    assert_eq!(last.state, ScanState::Done);
    assert_eq!(last.pages_fetched, 1);
    assert_eq!(last.followers_scored, result.total);
    assert_eq!(result.total, 12);
}

// ============================================================
// Scanner — pacing and cancellation
// ============================================================

#[tokio::test(start_paused = true)]
async fn pacing_delays_always_run() {
    let source = QueuedFollowers::new(vec![
        page((0..CHUNK_SIZE).map(bot).collect(), Some("c1")),
        page((0..5).map(friend).collect(), None),
    ]);
    let options = ScanOptions {
        as_of: as_of(),
        ..Default::default()
    };

    let started = tokio::time::Instant::now();
    let result = run(&source, options).await;
    let elapsed = started.elapsed();

    assert_eq!(result.total, 15);
    // One follower delay after the full chunk, one page delay before page 2.
    assert!(elapsed >= Duration::from_millis(2300), "{elapsed:?}");
}

#[tokio::test]
async fn cancelled_before_start_scans_nothing() {
    let source = QueuedFollowers::new(vec![page(vec![bot(1)], None)]);
    let scanner = FollowerScanner::new(&source, &Profiles, quick());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = scanner
        .scan(Some(&session()), "owner", &cancel)
        .await;
    assert!(result.cancelled);
    assert_eq!(result.total, 0);
    assert_eq!(result.pages_fetched, 0);
    assert_eq!(result.error_message, None);
}

#[tokio::test]
async fn cancellation_mid_scan_keeps_partial_results() {
    let cancel = CancellationToken::new();
    let source = QueuedFollowers::new(vec![
        page(vec![bot(1), bot(2), friend(1)], Some("c1")),
        page(vec![bot(3), bot(4)], Some("c2")),
        page(vec![bot(5)], None),
    ])
    .cancelling_on(2, cancel.clone());
    let scanner = FollowerScanner::new(&source, &Profiles, quick());

    let result = scanner
        .scan(Some(&session()), "owner", &cancel)
        .await;
    assert!(result.cancelled);
    // Page 1 was fully scored; page 2 arrived after cancellation.
    assert_eq!(result.total, 3);
    assert_eq!(result.high_count, 2);
    assert_eq!(source.cursors().len(), 2);
}
