// Derived analysis for one profile, assembled once by AnalysisBuilder.
//
// Collaborator outputs (contact hints, account info, archive capture,
// search hits) are collected first; `build()` then runs every pure analyzer over the raw
// profile and those inputs. A collaborator that failed is recorded as an
// `Unavailable` entry and its dependent field stays empty.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountInfo, ContactHints, Profile};
use crate::age::{self, AgeEstimation};
use crate::archive::ArchiveCapture;
use crate::bio::{self, BioAnalysis};
use crate::contact::{analyze_email, analyze_phone, EmailAnalysis, PhoneAnalysis};
use crate::impersonation::reverse_image::{reverse_image_links, ReverseImageLink};
use crate::impersonation::{self, ImpersonationCheck, SearchHit};
use crate::scoring::trust::TrustReport;

/// Network-bound inputs that can be missing from an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    ContactHints,
    AccountInfo,
    Archive,
    NameSearch,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::ContactHints => "contact hints",
            Signal::AccountInfo => "account info",
            Signal::Archive => "web archive",
            Signal::NameSearch => "name search",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailable {
    pub signal: Signal,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub contact_hints: Option<ContactHints>,
    /// Masked phone from the contact hints.
    pub phone: Option<PhoneAnalysis>,
    pub email: Option<EmailAnalysis>,
    /// Public business phone, analyzed the same way.
    pub business_phone: Option<PhoneAnalysis>,
    pub account_info: Option<AccountInfo>,
    pub bio: Option<BioAnalysis>,
    pub age: AgeEstimation,
    pub archive: Option<ArchiveCapture>,
    pub impersonation: Option<ImpersonationCheck>,
    /// Reverse image searches for the profile picture.
    pub reverse_image: Vec<ReverseImageLink>,
    pub unavailable: Vec<Unavailable>,
}

impl ProfileAnalysis {
    /// The phone analysis that drives contact scoring: the masked hint
    /// first, then the business phone.
    pub fn primary_phone(&self) -> Option<&PhoneAnalysis> {
        self.phone
            .as_ref()
            .filter(|p| p.country.is_some())
            .or(self.business_phone.as_ref().filter(|p| p.country.is_some()))
    }

    pub fn is_unavailable(&self, signal: Signal) -> bool {
        self.unavailable.iter().any(|u| u.signal == signal)
    }
}

/// Collects collaborator outputs, then runs the pure analyzers once.
pub struct AnalysisBuilder<'a> {
    profile: &'a Profile,
    as_of: NaiveDate,
    contact_hints: Option<ContactHints>,
    account_info: Option<AccountInfo>,
    archive: Option<ArchiveCapture>,
    search_hits: Option<Vec<SearchHit>>,
    unavailable: Vec<Unavailable>,
}

impl<'a> AnalysisBuilder<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self {
            profile,
            as_of: Utc::now().date_naive(),
            contact_hints: None,
            account_info: None,
            archive: None,
            search_hits: None,
            unavailable: Vec::new(),
        }
    }

    /// Reference date for the age estimate. Defaults to today.
    pub fn as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_contact_hints(mut self, hints: ContactHints) -> Self {
        self.contact_hints = Some(hints);
        self
    }

    pub fn with_account_info(mut self, info: Option<AccountInfo>) -> Self {
        self.account_info = info;
        self
    }

    pub fn with_archive(mut self, capture: Option<ArchiveCapture>) -> Self {
        self.archive = capture;
        self
    }

    pub fn with_search_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.search_hits = Some(hits);
        self
    }

    pub fn unavailable(mut self, signal: Signal, reason: impl Into<String>) -> Self {
        self.unavailable.push(Unavailable {
            signal,
            reason: reason.into(),
        });
        self
    }

    pub fn build(self) -> ProfileAnalysis {
        let profile = self.profile;

        let phone = self
            .contact_hints
            .as_ref()
            .and_then(|h| h.phone.as_deref())
            .map(analyze_phone);
        let email = self
            .contact_hints
            .as_ref()
            .and_then(|h| h.email.as_deref())
            .map(analyze_email);
        let business_phone = profile
            .business_phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(analyze_phone);

        let bio = profile.bio().map(bio::analyze_bio);
        let age = age::estimate_age(profile, self.archive.as_ref(), self.as_of);
        let impersonation = self
            .search_hits
            .as_deref()
            .map(|hits| impersonation::detect(profile, hits));
        let reverse_image = profile
            .profile_pic_url
            .as_deref()
            .map(reverse_image_links)
            .unwrap_or_default();

        ProfileAnalysis {
            contact_hints: self.contact_hints,
            phone,
            email,
            business_phone,
            account_info: self.account_info,
            bio,
            age,
            archive: self.archive,
            impersonation,
            reverse_image,
            unavailable: self.unavailable,
        }
    }
}

/// A profile with its analysis and trust verdict, as exported to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedProfile {
    pub profile: Profile,
    pub analysis: ProfileAnalysis,
    pub trust: TrustReport,
}
