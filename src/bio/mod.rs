// Bio analysis — embedded contacts, scam indicators and writing quality.
//
// Three independent passes over the biography text. Each is pure; a blank
// biography yields an empty analysis with no risk level.

pub mod quality;
pub mod scam;

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

pub use quality::{BioQuality, Language};
pub use scam::ScamIndicator;

/// Risk tier derived from the summed indicator points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BioRisk {
    Low,
    Moderate,
    High,
}

impl BioRisk {
    /// ≥40 high, ≥20 moderate, >0 low, 0 none.
    pub fn from_points(points: u32) -> Option<Self> {
        match points {
            p if p >= 40 => Some(BioRisk::High),
            p if p >= 20 => Some(BioRisk::Moderate),
            p if p > 0 => Some(BioRisk::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BioRisk::Low => "low",
            BioRisk::Moderate => "moderate",
            BioRisk::High => "high",
        }
    }
}

impl std::fmt::Display for BioRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioAnalysis {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub urls: Vec<String>,
    pub indicators: Vec<ScamIndicator>,
    pub scam_points: u32,
    pub risk_level: Option<BioRisk>,
    /// Explicit "not the real person" phrases (fan account, parody, ...).
    pub fake_phrases: Vec<String>,
    pub quality: BioQuality,
}

impl BioAnalysis {
    pub fn has_contact(&self) -> bool {
        !self.emails.is_empty() || !self.phones.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.indicators.iter().map(|i| i.label.as_str())
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .unwrap_or_else(|e| panic!("invalid email pattern: {e}"))
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(https?://\S+|www\.\S+|[a-z0-9-]+\.(com|net|org|io|co|me|ly|gl|gd|cc|gy|link|site|shop|store)\b(/\S*)?)",
    )
    .unwrap_or_else(|e| panic!("invalid url pattern: {e}"))
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\s().-]{6,}\d").unwrap_or_else(|e| panic!("invalid phone pattern: {e}"))
});

const MIN_PHONE_DIGITS: usize = 8;

/// Run extraction, scam matching and quality scoring over `text`.
pub fn analyze_bio(text: &str) -> BioAnalysis {
    let text = text.trim();
    let indicators = if text.is_empty() {
        Vec::new()
    } else {
        scam::match_indicators(text)
    };
    let scam_points = indicators.iter().map(|i| i.points).sum();

    BioAnalysis {
        emails: extract_emails(text),
        phones: extract_phones(text),
        urls: extract_urls(text),
        risk_level: BioRisk::from_points(scam_points),
        scam_points,
        indicators,
        fake_phrases: scam::fake_phrases(text),
        quality: quality::assess(text),
    }
}

pub fn extract_emails(text: &str) -> Vec<String> {
    dedup(EMAIL.find_iter(text).map(|m| m.as_str().to_string()))
}

/// URLs with trailing sentence punctuation removed. Email domains are not urls.
pub fn extract_urls(text: &str) -> Vec<String> {
    let without_emails = EMAIL.replace_all(text, " ");
    dedup(
        URL.find_iter(&without_emails)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')']).to_string()),
    )
}

/// Digit runs with at least eight digits, searched after removing emails
/// and urls so their digits are not mistaken for phone numbers.
pub fn extract_phones(text: &str) -> Vec<String> {
    let stripped = EMAIL.replace_all(text, " ");
    let stripped = URL.replace_all(&stripped, " ");
    dedup(
        PHONE
            .find_iter(&stripped)
            .map(|m| m.as_str().trim().to_string())
            .filter(|p| p.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS),
    )
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
