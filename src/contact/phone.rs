// Masked phone number analysis.
//
// Two strategies, tried in order:
// 1. Prefix match: the visible country calling code is looked up in
//    PREFIX_TABLE (longest prefix wins).
// 2. Pattern inference: when the code itself is masked, the shape of the
//    masked groups (code length, number of national groups, total digit
//    count) is compared with known national formats.
//
// A prefix match always beats pattern inference.

use serde::{Deserialize, Serialize};

use super::pattern::wildcard_match;
use super::Confidence;

/// Geographic fraud-risk tier attached to a calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRisk {
    VeryHigh,
    High,
    Moderate,
    Trusted,
}

impl PhoneRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneRisk::VeryHigh => "very_high",
            PhoneRisk::High => "high",
            PhoneRisk::Moderate => "moderate",
            PhoneRisk::Trusted => "trusted",
        }
    }

    /// Trust-score contribution of a phone registered in this tier.
    pub fn score_modifier(&self) -> i32 {
        match self {
            PhoneRisk::VeryHigh => -20,
            PhoneRisk::High => -12,
            PhoneRisk::Moderate => -5,
            PhoneRisk::Trusted => 3,
        }
    }

    pub fn is_risky(&self) -> bool {
        matches!(self, PhoneRisk::VeryHigh | PhoneRisk::High)
    }
}

impl std::fmt::Display for PhoneRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    Mobile,
    Landline,
}

impl PhoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneType::Mobile => "mobile",
            PhoneType::Landline => "landline",
        }
    }
}

/// Which strategy identified the country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneMatch {
    Prefix,
    Pattern,
}

/// Everything recoverable from a masked phone number.
///
/// All fields are `None` for blank input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneAnalysis {
    pub raw: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub risk_level: Option<PhoneRisk>,
    pub matched_by: Option<PhoneMatch>,
    pub confidence: Option<Confidence>,
    pub phone_type: Option<PhoneType>,
    pub phone_format: Option<String>,
    pub carrier_hint: Option<String>,
    pub operator_range: Option<String>,
    pub visible_digits: Option<String>,
}

/// A calling code with the country it belongs to and its risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixEntry {
    pub prefix: &'static str,
    pub country: &'static str,
    pub tier: PhoneRisk,
}

const fn entry(prefix: &'static str, country: &'static str, tier: PhoneRisk) -> PrefixEntry {
    PrefixEntry {
        prefix,
        country,
        tier,
    }
}

/// Calling codes tagged by fraud-origin risk. No entry is a prefix of another.
pub const PREFIX_TABLE: &[PrefixEntry] = &[
    // West Africa
    entry("+225", "Côte d'Ivoire", PhoneRisk::VeryHigh),
    entry("+229", "Benin", PhoneRisk::VeryHigh),
    entry("+228", "Togo", PhoneRisk::VeryHigh),
    entry("+233", "Ghana", PhoneRisk::VeryHigh),
    entry("+234", "Nigeria", PhoneRisk::VeryHigh),
    entry("+221", "Senegal", PhoneRisk::High),
    entry("+223", "Mali", PhoneRisk::High),
    entry("+226", "Burkina Faso", PhoneRisk::High),
    entry("+227", "Niger", PhoneRisk::High),
    entry("+220", "Gambia", PhoneRisk::High),
    entry("+224", "Guinea", PhoneRisk::High),
    entry("+232", "Sierra Leone", PhoneRisk::High),
    entry("+231", "Liberia", PhoneRisk::High),
    entry("+237", "Cameroon", PhoneRisk::High),
    entry("+243", "DR Congo", PhoneRisk::High),
    entry("+241", "Gabon", PhoneRisk::Moderate),
    entry("+242", "Congo", PhoneRisk::Moderate),
    entry("+212", "Morocco", PhoneRisk::Moderate),
    entry("+216", "Tunisia", PhoneRisk::Moderate),
    // Eastern Europe
    entry("+380", "Ukraine", PhoneRisk::Moderate),
    entry("+375", "Belarus", PhoneRisk::Moderate),
    // Southeast Asia
    entry("+95", "Myanmar", PhoneRisk::High),
    entry("+856", "Laos", PhoneRisk::High),
    entry("+855", "Cambodia", PhoneRisk::Moderate),
    entry("+63", "Philippines", PhoneRisk::Moderate),
    entry("+84", "Vietnam", PhoneRisk::Moderate),
    // Trusted
    entry("+33", "France", PhoneRisk::Trusted),
    entry("+1", "USA/Canada", PhoneRisk::Trusted),
    entry("+44", "United Kingdom", PhoneRisk::Trusted),
    entry("+49", "Germany", PhoneRisk::Trusted),
    entry("+34", "Spain", PhoneRisk::Trusted),
    entry("+39", "Italy", PhoneRisk::Trusted),
    entry("+41", "Switzerland", PhoneRisk::Trusted),
    entry("+32", "Belgium", PhoneRisk::Trusted),
    entry("+31", "Netherlands", PhoneRisk::Trusted),
    entry("+43", "Austria", PhoneRisk::Trusted),
    entry("+81", "Japan", PhoneRisk::Trusted),
    entry("+82", "South Korea", PhoneRisk::Trusted),
    entry("+61", "Australia", PhoneRisk::Trusted),
    entry("+64", "New Zealand", PhoneRisk::Trusted),
    entry("+46", "Sweden", PhoneRisk::Trusted),
    entry("+47", "Norway", PhoneRisk::Trusted),
    entry("+45", "Denmark", PhoneRisk::Trusted),
    entry("+358", "Finland", PhoneRisk::Trusted),
    entry("+353", "Ireland", PhoneRisk::Trusted),
    entry("+351", "Portugal", PhoneRisk::Trusted),
    entry("+48", "Poland", PhoneRisk::Trusted),
    entry("+420", "Czechia", PhoneRisk::Trusted),
    entry("+7", "Russia", PhoneRisk::Trusted),
    entry("+86", "China", PhoneRisk::Trusted),
    entry("+91", "India", PhoneRisk::Trusted),
    entry("+55", "Brazil", PhoneRisk::Trusted),
    entry("+52", "Mexico", PhoneRisk::Trusted),
    entry("+65", "Singapore", PhoneRisk::Trusted),
    entry("+852", "Hong Kong", PhoneRisk::Trusted),
    entry("+971", "UAE", PhoneRisk::Trusted),
    entry("+966", "Saudi Arabia", PhoneRisk::Trusted),
];

/// Shape of a national number written in international format with the
/// digits masked: `code_len` digits of calling code, then `groups`
/// space-separated national groups, `total` digits overall.
#[derive(Debug, Clone, Copy)]
pub struct FormatRule {
    pub code: &'static str,
    pub code_len: usize,
    pub groups: usize,
    pub total: usize,
    /// Length of the first national group, when needed to tell formats apart.
    pub first_group: Option<usize>,
}

const fn rule(
    code: &'static str,
    code_len: usize,
    groups: usize,
    total: usize,
    first_group: Option<usize>,
) -> FormatRule {
    FormatRule {
        code,
        code_len,
        groups,
        total,
        first_group,
    }
}

/// Known masked layouts, e.g. France `+** * ** ** ** **`.
pub const FORMAT_RULES: &[FormatRule] = &[
    rule("+33", 2, 5, 11, None),
    rule("+44", 2, 2, 12, None),
    rule("+1", 1, 3, 11, None),
    rule("+49", 2, 2, 13, None),
    rule("+39", 2, 3, 12, None),
    rule("+34", 2, 3, 11, Some(3)),
    rule("+31", 2, 3, 11, Some(1)),
    rule("+32", 2, 4, 11, Some(3)),
    rule("+41", 2, 4, 11, Some(2)),
    rule("+225", 3, 5, 13, None),
    rule("+234", 3, 3, 13, None),
    rule("+229", 3, 4, 11, None),
    rule("+233", 3, 3, 12, None),
    rule("+212", 3, 5, 12, None),
];

/// National numbering details used for type and carrier hints.
struct NationalPlan {
    code: &'static str,
    format: &'static str,
    mobile: &'static [&'static str],
    landline: &'static [&'static str],
}

const NATIONAL_PLANS: &[NationalPlan] = &[
    NationalPlan {
        code: "+33",
        format: "+33 X XX XX XX XX",
        mobile: &["6", "7"],
        landline: &["1", "2", "3", "4", "5", "9"],
    },
    NationalPlan {
        code: "+44",
        format: "+44 7XXX XXXXXX",
        mobile: &["7"],
        landline: &["1", "2", "3"],
    },
    NationalPlan {
        code: "+49",
        format: "+49 1XX XXXXXXXX",
        mobile: &["15", "16", "17"],
        landline: &["2", "3", "4", "5", "6", "7", "8", "9"],
    },
    NationalPlan {
        code: "+1",
        format: "+1 XXX XXX XXXX",
        mobile: &[],
        landline: &[],
    },
    NationalPlan {
        code: "+39",
        format: "+39 3XX XXX XXXX",
        mobile: &["3"],
        landline: &["0"],
    },
    NationalPlan {
        code: "+34",
        format: "+34 6XX XXX XXX",
        mobile: &["6", "7"],
        landline: &["9"],
    },
    NationalPlan {
        code: "+31",
        format: "+31 6 XXXX XXXX",
        mobile: &["6"],
        landline: &["1", "2", "3", "4", "5", "7"],
    },
    NationalPlan {
        code: "+32",
        format: "+32 4XX XX XX XX",
        mobile: &["4"],
        landline: &["1", "2", "3", "5", "6", "7", "8", "9"],
    },
    NationalPlan {
        code: "+41",
        format: "+41 7X XXX XX XX",
        mobile: &["7"],
        landline: &["2", "3", "4", "5", "6"],
    },
];

const GERMAN_OPERATORS: &[(&str, &str)] = &[
    ("151", "T-Mobile"),
    ("160", "T-Mobile"),
    ("170", "T-Mobile"),
    ("171", "T-Mobile"),
    ("175", "T-Mobile"),
    ("152", "Vodafone"),
    ("162", "Vodafone"),
    ("172", "Vodafone"),
    ("173", "Vodafone"),
    ("174", "Vodafone"),
    ("155", "O2"),
    ("157", "O2"),
    ("159", "O2"),
    ("176", "O2"),
    ("179", "O2"),
    ("163", "E-Plus"),
    ("177", "E-Plus"),
    ("178", "E-Plus"),
];

const NANP_AREAS: &[(&str, &str)] = &[
    ("212", "New York"),
    ("213", "Los Angeles"),
    ("312", "Chicago"),
    ("415", "San Francisco"),
    ("305", "Miami"),
    ("416", "Toronto"),
    ("514", "Montreal"),
    ("604", "Vancouver"),
];

const UK_AREAS: &[(&str, &str)] = &[
    ("20", "London"),
    ("121", "Birmingham"),
    ("131", "Edinburgh"),
    ("141", "Glasgow"),
];

/// Analyze a masked phone number such as `+33 6 ** ** ** 72` or `+** * ** ** ** 72`.
pub fn analyze_phone(raw: &str) -> PhoneAnalysis {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PhoneAnalysis::default();
    }

    let compact = compact(trimmed);
    let digits: String = compact.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = PhoneAnalysis {
        raw: Some(trimmed.to_string()),
        visible_digits: (!digits.is_empty()).then_some(digits),
        ..Default::default()
    };

    let (entry, matched_by) = match match_prefix(&compact) {
        Some(entry) => (entry, PhoneMatch::Prefix),
        None => match infer_from_format(trimmed) {
            Some(entry) => (entry, PhoneMatch::Pattern),
            None => return result,
        },
    };

    result.country = Some(entry.country.to_string());
    result.country_code = Some(entry.prefix.to_string());
    result.risk_level = Some(entry.tier);
    result.matched_by = Some(matched_by);
    result.confidence = Some(match matched_by {
        PhoneMatch::Prefix => Confidence::High,
        PhoneMatch::Pattern => Confidence::Medium,
    });

    let national = compact.get(entry.prefix.len()..).unwrap_or("");
    apply_national_plan(&mut result, entry.prefix, national);

    result
}

/// Longest calling code in PREFIX_TABLE that `compact` starts with.
pub fn match_prefix(compact: &str) -> Option<&'static PrefixEntry> {
    PREFIX_TABLE
        .iter()
        .filter(|e| compact.starts_with(e.prefix))
        .max_by_key(|e| e.prefix.len())
}

/// Look up a calling code exactly.
pub fn prefix_entry(code: &str) -> Option<&'static PrefixEntry> {
    PREFIX_TABLE.iter().find(|e| e.prefix == code)
}

/// Guess the country from the masked group layout alone.
///
/// Requires a leading `+` group. Visible digits in that group must agree
/// with the candidate calling code.
pub fn infer_from_format(raw: &str) -> Option<&'static PrefixEntry> {
    let mut groups = raw
        .split_whitespace()
        .map(|g| {
            g.chars()
                .filter(|c| c.is_ascii_digit() || *c == '*' || *c == '+')
                .collect::<String>()
        })
        .filter(|g| !g.is_empty());

    let code_group = groups.next()?;
    let code_group = code_group.strip_prefix('+')?;
    if code_group.is_empty() || code_group.contains('+') {
        return None;
    }
    let national: Vec<String> = groups.collect();
    if national.is_empty() {
        return None;
    }

    let code_len = code_group.chars().count();
    let total = code_len + national.iter().map(|g| g.chars().count()).sum::<usize>();
    let first_len = national[0].chars().count();

    FORMAT_RULES
        .iter()
        .find(|r| {
            r.code_len == code_len
                && r.groups == national.len()
                && r.total == total
                && r.first_group.map_or(true, |len| len == first_len)
                && wildcard_match(code_group, &r.code[1..])
        })
        .and_then(|r| prefix_entry(r.code))
}

/// Keep only `+`, digits and `*`; a leading `00` becomes `+`.
fn compact(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '*' || *c == '+')
        .collect();
    match kept.strip_prefix("00") {
        Some(rest) if !kept.starts_with('+') => format!("+{rest}"),
        _ => kept,
    }
}

fn apply_national_plan(result: &mut PhoneAnalysis, code: &str, national: &str) {
    let Some(plan) = NATIONAL_PLANS.iter().find(|p| p.code == code) else {
        return;
    };
    result.phone_format = Some(plan.format.to_string());

    // Only a visible leading run of digits tells us anything.
    let lead: String = national.chars().take_while(|c| c.is_ascii_digit()).collect();
    if lead.is_empty() {
        return;
    }

    if plan.mobile.iter().any(|p| lead.starts_with(p)) {
        result.phone_type = Some(PhoneType::Mobile);
    } else if plan.landline.iter().any(|p| lead.starts_with(p)) {
        result.phone_type = Some(PhoneType::Landline);
    }

    match code {
        "+33" => french_ranges(result, &lead),
        "+49" => {
            if let Some((_, op)) = GERMAN_OPERATORS.iter().find(|(p, _)| lead.starts_with(p)) {
                result.carrier_hint = Some(op.to_string());
                result.operator_range = Some(op.to_string());
            }
        }
        "+1" => {
            if let Some((_, area)) = NANP_AREAS.iter().find(|(p, _)| lead.starts_with(p)) {
                result.operator_range = Some(area.to_string());
            }
        }
        "+44" => {
            if let Some((_, area)) = UK_AREAS.iter().find(|(p, _)| lead.starts_with(p)) {
                result.operator_range = Some(area.to_string());
                result.phone_type = Some(PhoneType::Landline);
            }
        }
        _ => {}
    }
}

fn french_ranges(result: &mut PhoneAnalysis, lead: &str) {
    let two: String = lead.chars().take(2).collect();
    let Some(first) = lead.chars().next() else {
        return;
    };
    match first {
        '6' => {
            if two.len() == 2 {
                result.carrier_hint = Some(
                    match two.as_str() {
                        "60" | "61" | "62" | "63" => "Orange (historic 06 range)",
                        "64" | "65" => "SFR (historic 06 range)",
                        "66" | "67" => "Bouygues Telecom",
                        _ => "Mixed operators",
                    }
                    .to_string(),
                );
            }
            result.operator_range = Some(format!("06 range ({two})"));
        }
        '7' => {
            if two.len() == 2 {
                result.carrier_hint = Some(
                    match two.as_str() {
                        "70" | "71" | "72" | "73" => "Free Mobile / MVNOs",
                        _ => "New allocations (07)",
                    }
                    .to_string(),
                );
            }
            result.operator_range = Some(format!("07 range ({two})"));
        }
        '1' => result.operator_range = Some("Île-de-France (01)".to_string()),
        '2' => result.operator_range = Some("North-West (02)".to_string()),
        '3' => result.operator_range = Some("North-East (03)".to_string()),
        '4' => result.operator_range = Some("South-East (04)".to_string()),
        '5' => result.operator_range = Some("South-West (05)".to_string()),
        '9' => result.operator_range = Some("Internet box / VoIP (09)".to_string()),
        _ => {}
    }
}
