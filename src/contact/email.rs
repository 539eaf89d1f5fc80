// Masked email analysis.
//
// The local part yields a length range and its visible edge characters.
// The domain is matched against PROVIDER_SIGNATURES with position-aware
// wildcards; when nothing matches exactly, a per-TLD first/last character
// table guesses the provider at lower confidence.

use serde::{Deserialize, Serialize};

use super::pattern::{leading_visible, longest_mask_run, mask_count, trailing_visible, wildcard_match};
use super::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Free,
    Secure,
    Isp,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Free => "free",
            ProviderKind::Secure => "secure",
            ProviderKind::Isp => "isp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainType {
    Educational,
    Government,
    Organization,
    Military,
    Standard,
}

impl DomainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainType::Educational => "educational",
            DomainType::Government => "government",
            DomainType::Organization => "organization",
            DomainType::Military => "military",
            DomainType::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Low,
    Medium,
    High,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityLevel::Low => "low",
            SecurityLevel::Medium => "medium",
            SecurityLevel::High => "high",
        }
    }
}

/// Everything recoverable from a masked email address.
///
/// All fields are `None` for blank input or input without `@`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAnalysis {
    pub raw: Option<String>,
    pub domain: Option<String>,
    pub provider: Option<String>,
    pub provider_company: Option<String>,
    pub provider_kind: Option<ProviderKind>,
    pub provider_confidence: Option<Confidence>,
    pub domain_tld: Option<String>,
    pub domain_type: Option<DomainType>,
    pub security_level: Option<SecurityLevel>,
    /// First local-part character, when position 0 is unmasked.
    pub first_char: Option<char>,
    /// Last local-part character, when the final position is unmasked.
    pub last_char: Option<char>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub length_estimate: Option<String>,
}

/// A known mail provider and the exact domain it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSignature {
    pub domain: &'static str,
    pub name: &'static str,
    pub company: &'static str,
    pub kind: ProviderKind,
    pub security: SecurityLevel,
}

const fn sig(
    domain: &'static str,
    name: &'static str,
    company: &'static str,
    kind: ProviderKind,
    security: SecurityLevel,
) -> ProviderSignature {
    ProviderSignature {
        domain,
        name,
        company,
        kind,
        security,
    }
}

use ProviderKind::{Free, Isp, Secure};
use SecurityLevel::{High as Hi, Low as Lo, Medium as Med};

pub const PROVIDER_SIGNATURES: &[ProviderSignature] = &[
    sig("gmail.com", "Gmail", "Google", Free, Med),
    sig("googlemail.com", "Gmail", "Google", Free, Med),
    sig("yahoo.com", "Yahoo", "Yahoo", Free, Med),
    sig("yahoo.fr", "Yahoo France", "Yahoo", Free, Med),
    sig("yahoo.co.uk", "Yahoo UK", "Yahoo", Free, Med),
    sig("outlook.com", "Outlook", "Microsoft", Free, Med),
    sig("hotmail.com", "Hotmail", "Microsoft", Free, Med),
    sig("hotmail.fr", "Hotmail France", "Microsoft", Free, Med),
    sig("hotmail.co.uk", "Hotmail UK", "Microsoft", Free, Med),
    sig("live.com", "Live", "Microsoft", Free, Med),
    sig("msn.com", "MSN", "Microsoft", Free, Med),
    sig("icloud.com", "iCloud", "Apple", Free, Med),
    sig("me.com", "iCloud", "Apple", Free, Med),
    sig("mac.com", "iCloud", "Apple", Free, Med),
    sig("protonmail.com", "ProtonMail", "Proton", Secure, Hi),
    sig("proton.me", "ProtonMail", "Proton", Secure, Hi),
    sig("tutanota.com", "Tutanota", "Tutanota", Secure, Hi),
    sig("tutamail.com", "Tutanota", "Tutanota", Secure, Hi),
    sig("orange.fr", "Orange", "Orange FR", Isp, Med),
    sig("wanadoo.fr", "Wanadoo", "Orange FR", Isp, Med),
    sig("free.fr", "Free", "Free FR", Isp, Med),
    sig("sfr.fr", "SFR", "SFR FR", Isp, Med),
    sig("bbox.fr", "Bbox", "Bouygues FR", Isp, Med),
    sig("laposte.net", "LaPoste", "LaPoste FR", Free, Med),
    sig("gmx.com", "GMX", "GMX", Free, Med),
    sig("gmx.de", "GMX DE", "GMX", Free, Med),
    sig("web.de", "Web.de", "Web.de", Free, Med),
    sig("t-online.de", "T-Online", "Deutsche Telekom", Isp, Med),
    sig("sky.com", "Sky", "Sky UK", Isp, Med),
    sig("btinternet.com", "BT Internet", "BT", Isp, Med),
    sig("aol.com", "AOL", "AOL", Free, Lo),
    sig("mail.ru", "Mail.ru", "Mail.ru", Free, Lo),
    sig("rambler.ru", "Rambler", "Rambler", Free, Lo),
    sig("yandex.ru", "Yandex", "Yandex", Free, Lo),
    sig("yandex.com", "Yandex", "Yandex", Free, Lo),
];

/// Fallback guess: a TLD plus the first and last characters of the domain
/// name in front of it, pointing at a signature entry.
#[derive(Debug, Clone, Copy)]
pub struct TldHeuristic {
    pub tld: &'static str,
    pub first: char,
    pub last: char,
    pub signature: &'static str,
}

const fn guess(tld: &'static str, first: char, last: char, signature: &'static str) -> TldHeuristic {
    TldHeuristic {
        tld,
        first,
        last,
        signature,
    }
}

pub const TLD_HEURISTICS: &[TldHeuristic] = &[
    guess(".fr", 'o', 'e', "orange.fr"),
    guess(".fr", 'f', 'e', "free.fr"),
    guess(".fr", 's', 'r', "sfr.fr"),
    guess(".fr", 'w', 'o', "wanadoo.fr"),
    guess(".fr", 'b', 'x', "bbox.fr"),
    guess(".fr", 'h', 'l', "hotmail.fr"),
    guess(".fr", 'y', 'o', "yahoo.fr"),
    guess(".de", 'g', 'x', "gmx.de"),
    guess(".de", 'w', 'b', "web.de"),
    guess(".de", 't', 'e', "t-online.de"),
    guess(".co.uk", 'y', 'o', "yahoo.co.uk"),
    guess(".co.uk", 'h', 'l', "hotmail.co.uk"),
    guess(".ru", 'm', 'l', "mail.ru"),
    guess(".ru", 'y', 'x', "yandex.ru"),
    guess(".ru", 'r', 'r', "rambler.ru"),
    guess(".com", 'g', 'l', "gmail.com"),
    guess(".com", 'y', 'o', "yahoo.com"),
    guess(".com", 'o', 'k', "outlook.com"),
    guess(".com", 'h', 'l', "hotmail.com"),
    guess(".com", 'i', 'd', "icloud.com"),
    guess(".com", 'p', 'l', "protonmail.com"),
    guess(".com", 'a', 'l', "aol.com"),
    guess(".com", 'l', 'e', "live.com"),
    guess(".com", 'm', 'n', "msn.com"),
    guess(".com", 's', 'y', "sky.com"),
    guess(".com", 'b', 't', "btinternet.com"),
];

// Longest suffixes first so `.ac.uk` wins over a bare `.uk`.
const DOMAIN_TYPES: &[(&str, DomainType)] = &[
    (".edu.au", DomainType::Educational),
    (".ac.uk", DomainType::Educational),
    (".edu", DomainType::Educational),
    (".gouv.fr", DomainType::Government),
    (".gov.uk", DomainType::Government),
    (".gov", DomainType::Government),
    (".mil", DomainType::Military),
    (".org", DomainType::Organization),
];

/// Analyze a masked email such as `j***n@g****.com`.
pub fn analyze_email(raw: &str) -> EmailAnalysis {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return EmailAnalysis::default();
    };
    let domain = domain.trim().to_lowercase();

    let mut result = EmailAnalysis {
        raw: Some(trimmed.to_string()),
        ..Default::default()
    };

    apply_local_part(&mut result, local.trim());

    if domain.is_empty() {
        return result;
    }
    result.domain_tld = domain_tld(&domain);
    let domain_type = classify_domain(&domain);
    result.domain_type = Some(domain_type);

    if let Some(signature) = match_signature(&domain) {
        apply_provider(&mut result, signature, Confidence::High);
    } else if let Some((signature, confidence)) = guess_provider(&domain) {
        apply_provider(&mut result, signature, confidence);
    }

    if result.security_level.is_none()
        && matches!(
            domain_type,
            DomainType::Educational | DomainType::Government | DomainType::Military
        )
    {
        result.security_level = Some(SecurityLevel::Medium);
    }

    result.domain = Some(domain);
    result
}

/// The signature an exactly-shaped masked domain matches, in table order.
pub fn match_signature(domain: &str) -> Option<&'static ProviderSignature> {
    PROVIDER_SIGNATURES
        .iter()
        .find(|s| wildcard_match(domain, s.domain))
}

/// First/last-character guess for domains that match no signature.
///
/// Both edge characters agreeing gives `Medium`, one of them `Low`.
pub fn guess_provider(domain: &str) -> Option<(&'static ProviderSignature, Confidence)> {
    let (tld, name) = TLD_HEURISTICS
        .iter()
        .map(|h| h.tld)
        .filter_map(|tld| domain.strip_suffix(tld).map(|name| (tld, name)))
        .max_by_key(|(tld, _)| tld.len())?;

    let first = leading_visible(name).map(|c| c.to_ascii_lowercase());
    let last = trailing_visible(name).map(|c| c.to_ascii_lowercase());
    if first.is_none() && last.is_none() {
        return None;
    }

    let candidates = || TLD_HEURISTICS.iter().filter(move |h| h.tld == tld);
    let both = candidates().find(|h| first == Some(h.first) && last == Some(h.last));
    let (heuristic, confidence) = match both {
        Some(h) => (h, Confidence::Medium),
        None => (
            candidates().find(|h| first == Some(h.first) || last == Some(h.last))?,
            Confidence::Low,
        ),
    };

    PROVIDER_SIGNATURES
        .iter()
        .find(|s| s.domain == heuristic.signature)
        .map(|s| (s, confidence))
}

/// Classify a domain by its suffix.
pub fn classify_domain(domain: &str) -> DomainType {
    DOMAIN_TYPES
        .iter()
        .find(|(suffix, _)| domain.ends_with(suffix))
        .map(|(_, kind)| *kind)
        .unwrap_or(DomainType::Standard)
}

fn domain_tld(domain: &str) -> Option<String> {
    domain
        .rsplit_once('.')
        .map(|(_, tld)| tld)
        .filter(|tld| !tld.is_empty() && !tld.contains('*'))
        .map(|tld| format!(".{tld}"))
}

fn apply_local_part(result: &mut EmailAnalysis, local: &str) {
    if local.is_empty() {
        return;
    }
    let literal = local.chars().count();
    let masked = mask_count(local);
    let visible = literal - masked;

    let min = literal;
    let max = if longest_mask_run(local) >= 3 {
        visible + (3 * masked).min(15)
    } else {
        literal + masked
    }
    .max(min);

    result.first_char = leading_visible(local);
    result.last_char = trailing_visible(local);
    result.min_length = Some(min);
    result.max_length = Some(max);
    result.length_estimate = Some(if min == max {
        format!("{min} chars")
    } else {
        format!("{min}-{max} chars")
    });
}

fn apply_provider(result: &mut EmailAnalysis, signature: &ProviderSignature, confidence: Confidence) {
    result.provider = Some(signature.name.to_string());
    result.provider_company = Some(signature.company.to_string());
    result.provider_kind = Some(signature.kind);
    result.provider_confidence = Some(confidence);
    result.security_level = Some(signature.security);
}
