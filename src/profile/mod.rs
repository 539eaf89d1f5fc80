// Profile records — the raw account snapshot and its derived analysis.
//
// A `Profile` is what the upstream fetch returns and is never mutated after
// that. Everything computed from it lives in `analysis::ProfileAnalysis`,
// assembled once after all analyzers have finished.

pub mod analysis;

use serde::{Deserialize, Serialize};

/// Raw account attributes as returned by the profile fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub bio_links: Vec<String>,
    pub profile_pic_url: Option<String>,
    /// Avatar resource identifier, e.g. `"2891234567890123456_123456789"`.
    pub profile_pic_id: Option<String>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
    pub post_count: Option<u64>,
    pub is_private: bool,
    pub is_verified: bool,
    pub is_business: bool,
    pub business_category: Option<String>,
    pub business_email: Option<String>,
    pub business_phone: Option<String>,
    pub has_highlight_reels: bool,
    /// Owned posts visible on the profile, in upstream order.
    pub posts: Vec<MediaRef>,
}

/// One owned post: its numeric media id and upload time (Unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub taken_at: Option<i64>,
}

impl Profile {
    /// Create a bare profile with just a username. Handy for tests and for
    /// callers that fill in fields incrementally before analysis.
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    /// Display name, trimmed, or `None` when absent or blank.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.full_name.as_deref())
    }

    /// Biography, trimmed, or `None` when absent or blank.
    pub fn bio(&self) -> Option<&str> {
        non_blank(self.biography.as_deref())
    }

    /// All outbound links: the external url followed by bio links.
    pub fn links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = Vec::new();
        if let Some(url) = non_blank(self.external_url.as_deref()) {
            links.push(url);
        }
        for link in &self.bio_links {
            if let Some(link) = non_blank(Some(link)) {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
        links
    }

    /// Whether the business contact fields expose any way to reach the account.
    pub fn has_business_contact(&self) -> bool {
        non_blank(self.business_email.as_deref()).is_some()
            || non_blank(self.business_phone.as_deref()).is_some()
    }
}

/// Obfuscated contact fragments exposed by the lookup collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHints {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Upstream status string (e.g. `"ok"`, `"fail"`), kept for display.
    pub status: Option<String>,
}

/// Account kind reported by the mobile user-info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Personal,
    Business,
    Creator,
}

impl AccountType {
    /// Map the upstream numeric code; unknown codes are `None`.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(AccountType::Personal),
            2 => Some(AccountType::Business),
            3 => Some(AccountType::Creator),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Personal => "Personal",
            AccountType::Business => "Business",
            AccountType::Creator => "Creator",
        }
    }
}

/// Public details only the mobile user-info and search endpoints expose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub city: Option<String>,
    pub public_email: Option<String>,
    /// Public phone with its country calling code when one was given.
    pub public_phone: Option<String>,
    pub account_type: Option<AccountType>,
}

impl AccountInfo {
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.public_email.is_none()
            && self.public_phone.is_none()
            && self.account_type.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
