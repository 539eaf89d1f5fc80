// Trust score aggregator.
//
// Starts at BASE_SCORE and applies an ordered list of independent checks.
// Each check emits at most one TrustDetail; the score is the base plus the
// sum of all deltas, clamped to [0, 100]. An absent derived field means "no
// signal" and emits nothing.
//
// The function is pure: the same profile, analysis and reference date
// always produce the same score and the same evidence order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UsernameShape;
use crate::bio::{scam, BioRisk};
use crate::profile::analysis::ProfileAnalysis;
use crate::profile::Profile;

pub const BASE_SCORE: i32 = 40;

/// Avatar file names the platform serves for accounts without a picture.
pub const DEFAULT_AVATAR_MARKERS: &[&str] = &[
    "44884218_345707102882519_2446069589734326272_n",
    "default",
    "anonymous",
];

const USERNAME_MARKERS: &[&str] = &[
    "fake", "fan_", "_fan", "fanpage", "fanaccount", "parody", "backup", "real_", "_real",
];

const CLAIM_MARKERS: &[&str] = &["official", "officiel", "verified", "celebrity", "famous"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Neutral,
    Negative,
}

impl Severity {
    fn of(delta: i32) -> Self {
        match delta {
            d if d > 0 => Severity::Positive,
            d if d < 0 => Severity::Negative,
            _ => Severity::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustDetail {
    pub label: String,
    pub delta: i32,
    pub severity: Severity,
}

impl TrustDetail {
    pub fn new(label: impl Into<String>, delta: i32) -> Self {
        Self {
            label: label.into(),
            delta,
            severity: Severity::of(delta),
        }
    }
}

/// Display label for a trust score band. Not part of the score itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighlyTrustworthy,
    LikelyLegitimate,
    Moderate,
    LowConfidence,
    Suspicious,
    HighRisk,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => Verdict::HighlyTrustworthy,
            s if s >= 65 => Verdict::LikelyLegitimate,
            s if s >= 50 => Verdict::Moderate,
            s if s >= 35 => Verdict::LowConfidence,
            s if s >= 25 => Verdict::Suspicious,
            _ => Verdict::HighRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::HighlyTrustworthy => "Highly trustworthy",
            Verdict::LikelyLegitimate => "Likely legitimate",
            Verdict::Moderate => "Moderate",
            Verdict::LowConfidence => "Low confidence",
            Verdict::Suspicious => "Suspicious",
            Verdict::HighRisk => "High risk",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustReport {
    pub score: u8,
    /// Evidence in evaluation order.
    pub details: Vec<TrustDetail>,
    pub verdict: Verdict,
}

impl TrustReport {
    /// Build a report from evidence; the score is derived, never stored separately.
    pub fn from_details(details: Vec<TrustDetail>) -> Self {
        let total: i32 = BASE_SCORE + details.iter().map(|d| d.delta).sum::<i32>();
        let score = total.clamp(0, 100) as u8;
        Self {
            score,
            details,
            verdict: Verdict::from_score(score),
        }
    }

    /// Positive evidence, largest first.
    pub fn positive(&self) -> Vec<&TrustDetail> {
        self.by_severity(Severity::Positive)
    }

    pub fn neutral(&self) -> Vec<&TrustDetail> {
        self.by_severity(Severity::Neutral)
    }

    /// Negative evidence, largest penalty first.
    pub fn negative(&self) -> Vec<&TrustDetail> {
        self.by_severity(Severity::Negative)
    }

    fn by_severity(&self, severity: Severity) -> Vec<&TrustDetail> {
        let mut group: Vec<&TrustDetail> = self
            .details
            .iter()
            .filter(|d| d.severity == severity)
            .collect();
        // Stable: equal magnitudes keep evaluation order.
        group.sort_by_key(|d| std::cmp::Reverse(d.delta.unsigned_abs()));
        group
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarStatus {
    Missing,
    Default,
    Custom,
    /// Same avatar id as the account it appears to impersonate.
    Reused,
}

pub fn avatar_status(profile: &Profile, analysis: &ProfileAnalysis) -> AvatarStatus {
    if analysis
        .impersonation
        .as_ref()
        .is_some_and(|i| i.avatar_reused)
    {
        return AvatarStatus::Reused;
    }
    match profile
        .profile_pic_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        None => AvatarStatus::Missing,
        Some(url) => {
            let lower = url.to_lowercase();
            if DEFAULT_AVATAR_MARKERS.iter().any(|m| lower.contains(m)) {
                AvatarStatus::Default
            } else {
                AvatarStatus::Custom
            }
        }
    }
}

/// Score a profile. `as_of` is the reference date for age checks.
pub fn evaluate(profile: &Profile, analysis: &ProfileAnalysis, as_of: NaiveDate) -> TrustReport {
    let username = profile.username.to_lowercase();
    let age_years = analysis.age.best_age_years(as_of);
    let followers = profile.follower_count;
    let following = profile.following_count;

    let checks = [
        username_marker(&username),
        unverified_claim(profile, &username),
        avatar(avatar_status(profile, analysis)),
        profile
            .is_verified
            .then(|| TrustDetail::new("Verified account", 30)),
        age_years.map(account_age),
        followers.map(follower_band),
        post_activity(profile),
        display_name(profile),
        bio_quality(analysis),
        bio_scam(analysis),
        fake_bio(analysis),
        impersonation(analysis),
        links(profile),
        contact(profile, analysis),
        business(profile),
        follow_ratio(followers, following),
        following
            .filter(|f| *f >= 5000)
            .map(|f| TrustDetail::new(format!("Mass following ({f})"), -12)),
        young_and_popular(age_years, followers),
        username_shape(&profile.username),
        profile
            .has_highlight_reels
            .then(|| TrustDetail::new("Story highlights", 3)),
    ];

    TrustReport::from_details(checks.into_iter().flatten().collect())
}

fn username_marker(username: &str) -> Option<TrustDetail> {
    USERNAME_MARKERS
        .iter()
        .find(|m| username.contains(*m))
        .map(|m| TrustDetail::new(format!("Username suggests a fake or fan account ({m})"), -20))
}

fn unverified_claim(profile: &Profile, username: &str) -> Option<TrustDetail> {
    if profile.is_verified {
        return None;
    }
    let name = profile.display_name().unwrap_or("").to_lowercase();
    CLAIM_MARKERS
        .iter()
        .find(|m| username.contains(*m) || name.contains(*m))
        .map(|m| TrustDetail::new(format!("Claims to be {m} without verification"), -15))
}

fn avatar(status: AvatarStatus) -> Option<TrustDetail> {
    Some(match status {
        AvatarStatus::Custom => TrustDetail::new("Custom profile picture", 5),
        AvatarStatus::Default => TrustDetail::new("Default profile picture", -10),
        AvatarStatus::Missing => TrustDetail::new("No profile picture", -10),
        AvatarStatus::Reused => {
            TrustDetail::new("Profile picture reused from another account", -25)
        }
    })
}

fn account_age(years: f64) -> TrustDetail {
    if years >= 5.0 {
        TrustDetail::new(format!("Account about {years:.0} years old"), 15)
    } else if years >= 3.0 {
        TrustDetail::new(format!("Account about {years:.0} years old"), 10)
    } else if years >= 1.0 {
        TrustDetail::new(format!("Account about {years:.1} years old"), 5)
    } else {
        TrustDetail::new("Account less than a year old", -8)
    }
}

fn follower_band(count: u64) -> TrustDetail {
    let (label, delta) = match count {
        c if c >= 100_000 => ("100k+ followers", 12),
        c if c >= 10_000 => ("10k+ followers", 10),
        c if c >= 1_000 => ("1k+ followers", 7),
        c if c >= 100 => ("100+ followers", 3),
        c if c > 0 => ("Few followers", 0),
        _ => ("No followers", -5),
    };
    TrustDetail::new(label, delta)
}

fn post_activity(profile: &Profile) -> Option<TrustDetail> {
    let posts = profile.post_count?;
    let followers = profile.follower_count.unwrap_or(0);
    if followers >= 1_000 && posts <= 2 {
        return Some(TrustDetail::new(
            format!("{followers} followers but only {posts} posts"),
            -20,
        ));
    }
    match posts {
        p if p >= 100 => Some(TrustDetail::new("100+ posts", 8)),
        p if p >= 20 => Some(TrustDetail::new("20+ posts", 5)),
        p if p >= 5 => Some(TrustDetail::new("A few posts", 2)),
        0 if !profile.is_private => Some(TrustDetail::new("No posts", -8)),
        _ => None,
    }
}

fn display_name(profile: &Profile) -> Option<TrustDetail> {
    Some(match profile.display_name() {
        None => TrustDetail::new("No display name", -5),
        Some(name) if name.split_whitespace().count() >= 2 => {
            TrustDetail::new("Full display name", 4)
        }
        Some(_) => TrustDetail::new("Single-word display name", 0),
    })
}

fn bio_quality(analysis: &ProfileAnalysis) -> Option<TrustDetail> {
    let Some(bio) = &analysis.bio else {
        return Some(TrustDetail::new("No bio", -5));
    };
    let q = &bio.quality;
    Some(if q.well_written {
        TrustDetail::new("Well-written bio", 6)
    } else if q.exempt {
        TrustDetail::new("Short bio", 0)
    } else if q.score < 0 {
        TrustDetail::new("Poorly written bio", -3)
    } else {
        TrustDetail::new("Bio present", 2)
    })
}

fn bio_scam(analysis: &ProfileAnalysis) -> Option<TrustDetail> {
    let bio = analysis.bio.as_ref()?;
    let labels = bio.labels().collect::<Vec<_>>().join(", ");
    match bio.risk_level? {
        BioRisk::High => Some(TrustDetail::new(format!("High scam risk in bio: {labels}"), -20)),
        BioRisk::Moderate => Some(TrustDetail::new(
            format!("Moderate scam risk in bio: {labels}"),
            -10,
        )),
        BioRisk::Low => Some(TrustDetail::new(format!("Low scam risk in bio: {labels}"), -3)),
    }
}

fn fake_bio(analysis: &ProfileAnalysis) -> Option<TrustDetail> {
    let phrase = analysis.bio.as_ref()?.fake_phrases.first()?;
    Some(TrustDetail::new(
        format!("Bio says it is not the real person (\"{phrase}\")"),
        -15,
    ))
}

fn impersonation(analysis: &ProfileAnalysis) -> Option<TrustDetail> {
    let check = analysis.impersonation.as_ref()?;
    if !check.is_impersonation {
        return None;
    }
    let matched = check.matched.as_ref()?;
    Some(if matched.is_verified {
        TrustDetail::new(
            format!("Impersonates verified account @{}", matched.username),
            -30,
        )
    } else {
        TrustDetail::new(
            format!("Impersonates popular account @{}", matched.username),
            -20,
        )
    })
}

fn links(profile: &Profile) -> Option<TrustDetail> {
    let links = profile.links();
    if links.is_empty() {
        return None;
    }
    Some(if links.iter().any(|l| scam::contains_shortener(l)) {
        TrustDetail::new("Shortened link in profile", -5)
    } else {
        TrustDetail::new("External link", 3)
    })
}

fn contact(profile: &Profile, analysis: &ProfileAnalysis) -> Option<TrustDetail> {
    if let Some(phone) = analysis.primary_phone() {
        if let (Some(tier), Some(country)) = (phone.risk_level, phone.country.as_deref()) {
            return Some(TrustDetail::new(
                format!("Phone registered in {country} ({tier} risk)"),
                tier.score_modifier(),
            ));
        }
    }
    let has_hint = analysis
        .contact_hints
        .as_ref()
        .is_some_and(|h| h.email.is_some() || h.phone.is_some());
    let in_bio = analysis.bio.as_ref().is_some_and(|b| b.has_contact());
    (has_hint || in_bio || profile.has_business_contact())
        .then(|| TrustDetail::new("Contact information available", 3))
}

fn business(profile: &Profile) -> Option<TrustDetail> {
    if !profile.is_business {
        return None;
    }
    let has_category = profile
        .business_category
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    let has_contact = profile.has_business_contact();
    match (has_category, has_contact) {
        (true, true) => Some(TrustDetail::new("Complete business profile", 4)),
        (false, false) => Some(TrustDetail::new("Empty business profile", -4)),
        _ => None,
    }
}

fn follow_ratio(followers: Option<u64>, following: Option<u64>) -> Option<TrustDetail> {
    let (followers, following) = (followers?, following?);
    if followers >= 1_000 && (following == 0 || followers as f64 / following as f64 >= 10.0) {
        return Some(TrustDetail::new("Strong follower ratio", 5));
    }
    if following > 500 && (followers as f64 / following as f64) < 0.1 {
        return Some(TrustDetail::new(
            format!("Follows {following} but only {followers} follow back"),
            -8,
        ));
    }
    None
}

fn young_and_popular(age_years: Option<f64>, followers: Option<u64>) -> Option<TrustDetail> {
    let (age, followers) = (age_years?, followers?);
    (age < 1.0 && followers >= 10_000).then(|| {
        TrustDetail::new(
            format!("New account with {followers} followers"),
            -15,
        )
    })
}

fn username_shape(username: &str) -> Option<TrustDetail> {
    let shape = UsernameShape::of(username);
    (shape.digits >= 4 || shape.digit_ratio() > 0.3 || shape.underscores >= 3)
        .then(|| TrustDetail::new("Username with many digits or underscores", -8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_derived_from_details() {
        let report = TrustReport::from_details(vec![
            TrustDetail::new("a", 30),
            TrustDetail::new("b", 50),
        ]);
        assert_eq!(report.score, 100);
        let report = TrustReport::from_details(vec![TrustDetail::new("a", -90)]);
        assert_eq!(report.score, 0);
        assert_eq!(report.verdict, Verdict::HighRisk);
    }

    #[test]
    fn groups_sort_by_magnitude() {
        let report = TrustReport::from_details(vec![
            TrustDetail::new("small", 3),
            TrustDetail::new("bad", -8),
            TrustDetail::new("big", 30),
            TrustDetail::new("worse", -20),
            TrustDetail::new("flat", 0),
        ]);
        let pos: Vec<_> = report.positive().iter().map(|d| d.label.as_str()).collect();
        let neg: Vec<_> = report.negative().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(pos, vec!["big", "small"]);
        assert_eq!(neg, vec!["worse", "bad"]);
        assert_eq!(report.neutral().len(), 1);
    }

    #[test]
    fn verdict_bands() {
        assert_eq!(Verdict::from_score(80), Verdict::HighlyTrustworthy);
        assert_eq!(Verdict::from_score(79), Verdict::LikelyLegitimate);
        assert_eq!(Verdict::from_score(50), Verdict::Moderate);
        assert_eq!(Verdict::from_score(35), Verdict::LowConfidence);
        assert_eq!(Verdict::from_score(25), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(24), Verdict::HighRisk);
    }
}
