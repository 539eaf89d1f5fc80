// Reduced follower scorer — cheap, offline-only risk for one follower.
//
// Uses only what a follower page exposes. No network-bound analysis runs
// here, so a whole page can be scored in parallel.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UsernameShape;
use crate::age::{self, AgeBand};

pub const NO_PICTURE_POINTS: u8 = 30;
pub const NO_NAME_POINTS: u8 = 15;
pub const DIGITS_POINTS: u8 = 15;
pub const UNDERSCORES_POINTS: u8 = 10;
pub const NAME_KEYWORD_POINTS: u8 = 25;
pub const PRIVATE_NO_PICTURE_POINTS: u8 = 15;
pub const NEW_ACCOUNT_POINTS: u8 = 10;

/// Keywords in a display name typical of spam, promo and scam accounts.
pub const NAME_KEYWORDS: &[&str] = &[
    "crypto", "bitcoin", "forex", "invest", "trader", "trading", "promo", "giveaway", "cash",
    "money", "onlyfans", "sugar daddy", "escort", "hacker", "recovery", "followers", "free",
];

/// A follower as listed on a follower page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRecord {
    pub user_id: Option<String>,
    pub username: String,
    pub full_name: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub has_anonymous_profile_picture: bool,
    pub profile_pic_url: Option<String>,
}

impl FollowerRecord {
    pub fn has_picture(&self) -> bool {
        !self.has_anonymous_profile_picture
            && self
                .profile_pic_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowerTier {
    Normal,
    Suspicious,
    High,
}

impl FollowerTier {
    /// ≥50 high, ≥30 suspicious, else normal.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 50 => FollowerTier::High,
            s if s >= 30 => FollowerTier::Suspicious,
            _ => FollowerTier::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowerTier::Normal => "normal",
            FollowerTier::Suspicious => "suspicious",
            FollowerTier::High => "high",
        }
    }
}

impl std::fmt::Display for FollowerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerAnalysis {
    pub username: String,
    pub user_id: Option<String>,
    pub has_display_name: bool,
    pub is_private: bool,
    pub is_verified: bool,
    pub risk_score: u8,
    pub tier: FollowerTier,
    pub flags: Vec<String>,
    pub age_band: Option<AgeBand>,
}

/// Score one follower. Verified followers are always normal with score 0.
pub fn score_follower(record: &FollowerRecord, as_of: NaiveDate) -> FollowerAnalysis {
    let age_band = record
        .user_id
        .as_deref()
        .and_then(|id| age::user_id_band(id, as_of));
    let has_display_name = record.display_name().is_some();

    let mut analysis = FollowerAnalysis {
        username: record.username.clone(),
        user_id: record.user_id.clone(),
        has_display_name,
        is_private: record.is_private,
        is_verified: record.is_verified,
        risk_score: 0,
        tier: FollowerTier::Normal,
        flags: Vec::new(),
        age_band,
    };
    if record.is_verified {
        return analysis;
    }

    let mut score: u32 = 0;
    let mut flag = |points: u8, label: &str| {
        score += u32::from(points);
        analysis.flags.push(label.to_string());
    };

    let has_picture = record.has_picture();
    if !has_picture {
        flag(NO_PICTURE_POINTS, "No profile picture");
    }
    if !has_display_name {
        flag(NO_NAME_POINTS, "No display name");
    }

    let shape = UsernameShape::of(&record.username);
    if shape.digits >= 4 || shape.digit_ratio() >= 0.4 {
        flag(DIGITS_POINTS, "Many digits in username");
    }
    if shape.underscores >= 2 {
        flag(UNDERSCORES_POINTS, "Multiple underscores in username");
    }

    if let Some(name) = record.display_name() {
        let lower = name.to_lowercase();
        if let Some(keyword) = NAME_KEYWORDS.iter().find(|k| lower.contains(*k)) {
            flag(NAME_KEYWORD_POINTS, &format!("Suspicious keyword in name: {keyword}"));
        }
    }

    if record.is_private && !has_picture {
        flag(PRIVATE_NO_PICTURE_POINTS, "Private with no picture");
    }
    if age_band == Some(AgeBand::UnderOne) {
        flag(NEW_ACCOUNT_POINTS, "Account under one year old");
    }

    let risk_score = score.min(100) as u8;
    analysis.risk_score = risk_score;
    analysis.tier = FollowerTier::from_score(risk_score);
    analysis
}
