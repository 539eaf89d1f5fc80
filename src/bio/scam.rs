// Scam-indicator table — named regex categories with severity weights.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// One matched category in a biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamIndicator {
    pub label: String,
    pub points: u32,
}

struct Category {
    label: &'static str,
    points: u32,
    pattern: Regex,
}

fn category(label: &'static str, points: u32, pattern: &str) -> Category {
    Category {
        label,
        points,
        // Patterns are literals in this file; a bad one is a programming error.
        pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern for {label}: {e}")),
    }
}

pub const SHORTENED_URL_LABEL: &str = "Shortened URL";
pub const SHORTENED_URL_POINTS: u32 = 10;

/// Link shorteners commonly used to hide scam destinations.
pub const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly", "tinyurl", "t.co", "goo.gl", "ow.ly", "is.gd", "buff.ly", "tiny.cc", "rb.gy",
];

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    vec![
        category(
            "Investment/Crypto",
            15,
            r"(?i)\b(invest(ing|ment|ments|or|ors)?|trading|trader|forex|crypto|bitcoin|btc|eth|nft)s?\b",
        ),
        category(
            "Money-making claims",
            15,
            r"(?i)\b(make money|earn money|income|profit|roi|returns)\b",
        ),
        category(
            "Income claims",
            20,
            r"(?i)(\$\d+|€\d+|\b\d+k\b|\b\d+\s?[$€])\s*(per|a|/)?\s*(day|week|month)\b",
        ),
        category(
            "Get-rich-quick",
            20,
            r"(?i)\b(passive income|financial freedom|get rich|millionaire)\b",
        ),
        category(
            "Romance bait",
            15,
            r"(?i)\b(single|lonely|looking for love|soulmate|true love)\b",
        ),
        category(
            "Sympathy story",
            20,
            r"(?i)\b(widow|widower|divorced|lost my|passed away)\b",
        ),
        category(
            "Trust-building",
            10,
            r"(?i)\b(god.?fearing|honest|loyal|faithful|trustworthy)\b",
        ),
        category(
            "Contact request",
            10,
            r"(?i)\b(dm|message|contact|text|whatsapp|telegram)\s*(me|for|now)\b",
        ),
        category(
            "Link pushing",
            10,
            r"(?i)\b(link in bio|(click|check|tap) (the )?link)\b",
        ),
        category(
            "Urgency tactics",
            15,
            r"(?i)\b(limited time|act now|don'?t miss|last chance|hurry)\b",
        ),
        category(
            "Job offer",
            10,
            r"(?i)\b(hiring|job opportunity|work from home|remote job)\b",
        ),
        category(
            "Hacking services",
            30,
            r"(?i)\b(hack(er|ers|ing)?|recover (your )?account|account recovery|unlock)\b",
        ),
        category(
            "Supernatural",
            20,
            r"(?i)\b(spell caster|love spells?|voodoo|psychic|fortune teller)\b",
        ),
        category(
            "Lottery/inheritance",
            30,
            r"(?i)\b(beneficiary|inheritance|lottery|jackpot|you (have )?won|winner|claim (your )?(prize|reward))\b",
        ),
        category(
            "Military",
            15,
            r"(?i)\b(army|military|soldier|deployed|overseas)\b",
        ),
        category(
            "Oil rig",
            20,
            r"(?i)\b(oil rig|offshore|petroleum engineer|contractor)\b",
        ),
    ]
});

static SHORTENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bit\.ly|tinyurl|t\.co|goo\.gl|ow\.ly|is\.gd|buff\.ly|tiny\.cc|rb\.gy)\b")
        .unwrap_or_else(|e| panic!("invalid shortener pattern: {e}"))
});

/// Phrases an account uses to say it is not the person it shows.
pub const FAKE_BIO_PHRASES: &[&str] = &[
    "fan account",
    "fan page",
    "fanpage",
    "parody",
    "not affiliated",
    "not the real",
    "unofficial",
    "backup account",
    "impersonat",
    "tribute page",
];

/// Every category matching `text`, each counted once, in table order.
/// A shortened-URL domain adds its own indicator last.
pub fn match_indicators(text: &str) -> Vec<ScamIndicator> {
    let mut found: Vec<ScamIndicator> = CATEGORIES
        .iter()
        .filter(|c| c.pattern.is_match(text))
        .map(|c| ScamIndicator {
            label: c.label.to_string(),
            points: c.points,
        })
        .collect();

    if contains_shortener(text) {
        found.push(ScamIndicator {
            label: SHORTENED_URL_LABEL.to_string(),
            points: SHORTENED_URL_POINTS,
        });
    }
    found
}

/// Whether `text` mentions a known link-shortener domain.
pub fn contains_shortener(text: &str) -> bool {
    SHORTENER.is_match(text)
}

/// Explicit "this is not the real person" phrases present in `text`.
pub fn fake_phrases(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    FAKE_BIO_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<String> {
        match_indicators(text).into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(CATEGORIES.len(), 16);
    }

    #[test]
    fn income_claims_match_currency_rates() {
        assert!(labels("Earn $500/day from home").contains(&"Income claims".to_string()));
        assert!(labels("10k a month easy").contains(&"Income claims".to_string()));
    }

    #[test]
    fn won_alone_is_not_lottery() {
        assert!(labels("we won the match yesterday").is_empty());
        assert!(labels("Congratulations, you won!").contains(&"Lottery/inheritance".to_string()));
    }

    #[test]
    fn engineer_alone_is_not_oil_rig() {
        assert!(labels("software engineer in Lyon").is_empty());
    }

    #[test]
    fn shortener_requires_word_boundary() {
        assert!(contains_shortener("see bit.ly/abc"));
        assert!(contains_shortener("t.co/xyz"));
        assert!(!contains_shortener("chat.com"));
    }

    #[test]
    fn fake_phrase_is_case_insensitive() {
        assert_eq!(fake_phrases("PARODY account"), vec!["parody".to_string()]);
    }
}
