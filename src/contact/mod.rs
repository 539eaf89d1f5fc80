// Contact obfuscation analysis — masked phone numbers and email addresses.
//
// Lookup-style endpoints expose contact details with most characters
// replaced by `*` (e.g. `+** * ** ** ** 72`, `j***n@g****.com`). These
// analyzers recover what the surviving characters and the mask structure
// still reveal: country and risk tier for phones, provider and domain type
// for emails.

pub mod email;
pub mod pattern;
pub mod phone;

use serde::{Deserialize, Serialize};

pub use email::{analyze_email, EmailAnalysis};
pub use phone::{analyze_phone, PhoneAnalysis};

/// How sure an analyzer is about an inferred attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
