// Account age estimation — five independent weak signals plus arbitration.
//
// Every method output is kept for display even when another one wins. The
// user-id lookup always wins when present because it cannot be influenced
// by the account owner; otherwise the highest-confidence estimate wins.

pub mod checkpoints;
pub mod snowflake;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveCapture;
use crate::profile::Profile;

use checkpoints::Lookup;

pub const USER_ID_CONFIDENCE: u8 = 90;
pub const USER_ID_BEYOND_TABLE_CONFIDENCE: u8 = 70;
pub const FIRST_POST_CONFIDENCE: u8 = 85;
pub const MEDIA_ID_CONFIDENCE: u8 = 80;
pub const ARCHIVE_CONFIDENCE: u8 = 75;
pub const AVATAR_ID_CONFIDENCE: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSource {
    UserId,
    FirstPost,
    MediaId,
    AvatarId,
    WebArchive,
}

impl AgeSource {
    pub fn label(&self) -> &'static str {
        match self {
            AgeSource::UserId => "User ID",
            AgeSource::FirstPost => "First post",
            AgeSource::MediaId => "Media ID",
            AgeSource::AvatarId => "Avatar ID",
            AgeSource::WebArchive => "Web archive",
        }
    }
}

impl std::fmt::Display for AgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One method's answer: a `YYYY-MM` or `YYYY-MM-DD` date and a 0–100 confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEstimate {
    pub source: AgeSource,
    pub date: String,
    pub confidence: u8,
}

impl MethodEstimate {
    pub fn new(source: AgeSource, date: impl Into<String>, confidence: u8) -> Self {
        Self {
            source,
            date: date.into(),
            confidence,
        }
    }

    /// The estimate's date; month-only dates resolve to the first of the month.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let full = if self.date.len() == 7 {
            format!("{}-01", self.date)
        } else {
            self.date.clone()
        };
        NaiveDate::parse_from_str(&full, "%Y-%m-%d").ok()
    }

    /// Age in years at `as_of`, recomputed from the date string.
    pub fn age_years(&self, as_of: NaiveDate) -> Option<f64> {
        let created = self.parsed_date()?;
        let days = (as_of - created).num_days().max(0);
        Some(days as f64 / 365.25)
    }
}

/// Coarse age bucket used by follower scoring and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    UnderOne,
    OneToThree,
    ThreeToFive,
    FivePlus,
}

impl AgeBand {
    pub fn from_years(years: f64) -> Self {
        if years < 1.0 {
            AgeBand::UnderOne
        } else if years < 3.0 {
            AgeBand::OneToThree
        } else if years < 5.0 {
            AgeBand::ThreeToFive
        } else {
            AgeBand::FivePlus
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::UnderOne => "< 1 year",
            AgeBand::OneToThree => "1-3 years",
            AgeBand::ThreeToFive => "3-5 years",
            AgeBand::FivePlus => "5+ years",
        }
    }
}

impl std::fmt::Display for AgeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEstimation {
    pub user_id: Option<MethodEstimate>,
    pub first_post: Option<MethodEstimate>,
    pub media_id: Option<MethodEstimate>,
    pub avatar_id: Option<MethodEstimate>,
    pub archive: Option<MethodEstimate>,
    pub best: Option<MethodEstimate>,
}

impl AgeEstimation {
    /// Assemble the per-method estimates and pick the best one.
    pub fn from_methods(
        user_id: Option<MethodEstimate>,
        first_post: Option<MethodEstimate>,
        media_id: Option<MethodEstimate>,
        avatar_id: Option<MethodEstimate>,
        archive: Option<MethodEstimate>,
    ) -> Self {
        let mut estimation = Self {
            user_id,
            first_post,
            media_id,
            avatar_id,
            archive,
            best: None,
        };
        estimation.best = estimation.arbitrate();
        estimation
    }

    /// All available method estimates in a fixed order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodEstimate> {
        [
            &self.user_id,
            &self.first_post,
            &self.media_id,
            &self.avatar_id,
            &self.archive,
        ]
        .into_iter()
        .flatten()
    }

    /// Age of the best estimate in years at `as_of`.
    pub fn best_age_years(&self, as_of: NaiveDate) -> Option<f64> {
        self.best.as_ref().and_then(|b| b.age_years(as_of))
    }

    fn arbitrate(&self) -> Option<MethodEstimate> {
        if let Some(by_id) = &self.user_id {
            return Some(by_id.clone());
        }
        // Ties keep the earlier method in `methods()` order.
        self.methods()
            .fold(None::<&MethodEstimate>, |best, m| match best {
                Some(b) if b.confidence >= m.confidence => Some(b),
                _ => Some(m),
            })
            .cloned()
    }
}

/// Run every estimator that has input and arbitrate.
pub fn estimate_age(
    profile: &Profile,
    archive: Option<&ArchiveCapture>,
    as_of: NaiveDate,
) -> AgeEstimation {
    AgeEstimation::from_methods(
        profile
            .user_id
            .as_deref()
            .and_then(|id| from_user_id(id, as_of)),
        from_first_post(profile),
        from_media_ids(profile),
        profile.profile_pic_id.as_deref().and_then(from_avatar_id),
        archive.and_then(from_archive),
    )
}

/// Checkpoint lookup on the numeric user id.
///
/// Ids past the last checkpoint were created after the table was built, so
/// they are dated to the month of `as_of` at reduced confidence.
pub fn from_user_id(user_id: &str, as_of: NaiveDate) -> Option<MethodEstimate> {
    let id: u64 = user_id.trim().parse().ok()?;
    let (year, month, confidence) = match checkpoints::lookup(id)? {
        Lookup::Within(cp) => (cp.year, cp.month, USER_ID_CONFIDENCE),
        Lookup::BeyondTable => (
            as_of.year(),
            as_of.month(),
            USER_ID_BEYOND_TABLE_CONFIDENCE,
        ),
    };
    Some(MethodEstimate::new(
        AgeSource::UserId,
        format!("{year:04}-{month:02}"),
        confidence,
    ))
}

/// Earliest upload time among visible posts of a public account.
pub fn from_first_post(profile: &Profile) -> Option<MethodEstimate> {
    if profile.is_private {
        return None;
    }
    let earliest = profile.posts.iter().filter_map(|p| p.taken_at).min()?;
    let at = DateTime::<Utc>::from_timestamp(earliest, 0)?;
    Some(MethodEstimate::new(
        AgeSource::FirstPost,
        day(at),
        FIRST_POST_CONFIDENCE,
    ))
}

/// Oldest time decoded from the visible post ids.
pub fn from_media_ids(profile: &Profile) -> Option<MethodEstimate> {
    let oldest = profile
        .posts
        .iter()
        .filter_map(|p| snowflake::decode_str(&p.id))
        .min()?;
    Some(MethodEstimate::new(
        AgeSource::MediaId,
        day(oldest),
        MEDIA_ID_CONFIDENCE,
    ))
}

/// Time decoded from the avatar resource id.
pub fn from_avatar_id(profile_pic_id: &str) -> Option<MethodEstimate> {
    let at = snowflake::avatar_token(profile_pic_id).and_then(snowflake::decode)?;
    Some(MethodEstimate::new(
        AgeSource::AvatarId,
        day(at),
        AVATAR_ID_CONFIDENCE,
    ))
}

pub fn from_archive(capture: &ArchiveCapture) -> Option<MethodEstimate> {
    let estimate = MethodEstimate::new(AgeSource::WebArchive, capture.date.clone(), ARCHIVE_CONFIDENCE);
    estimate.parsed_date().map(|_| estimate)
}

/// Coarse band from the user id alone, for follower scoring.
pub fn user_id_band(user_id: &str, as_of: NaiveDate) -> Option<AgeBand> {
    from_user_id(user_id, as_of)
        .and_then(|e| e.age_years(as_of))
        .map(AgeBand::from_years)
}

fn day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
