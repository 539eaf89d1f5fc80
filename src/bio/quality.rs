// Bio writing quality — a bounded [-10, 10] score and a "well written" flag.
//
// Short bios (under MIN_WORDS) carry too little signal and are marked
// exempt instead of being judged.

use serde::{Deserialize, Serialize};

pub const MIN_WORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    French,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioQuality {
    pub word_count: usize,
    pub sentence_count: usize,
    pub has_punctuation: bool,
    /// Share of sentences that start with an uppercase letter.
    pub capitalization_ratio: f64,
    pub error_count: usize,
    /// Share of letters that are uppercase.
    pub caps_ratio: f64,
    pub language: Language,
    pub score: i32,
    pub well_written: bool,
    pub exempt: bool,
}

// Words that are also common French ("a", "an", "on") are left out.
const EN_STOP_WORDS: &[&str] = &[
    "the", "and", "is", "to", "of", "in", "you", "my", "for", "with", "it", "this", "that",
    "are", "at", "be", "we",
];

const FR_STOP_WORDS: &[&str] = &[
    "le", "la", "les", "et", "est", "un", "une", "de", "des", "du", "je", "tu", "mon", "ma", "mes",
    "pour", "avec", "dans", "sur", "pas", "que", "qui", "nous", "vous",
];

// Single-token slips.
const EN_SLIPS: &[&str] = &[
    "alot", "definately", "seperate", "recieve", "untill", "wich", "becuase", "thier", "teh",
    "dont", "doesnt", "didnt", "cant", "im", "ive", "wanna", "gonna", "u", "ur", "pls", "plz",
];

const EN_SLIP_PHRASES: &[&str] = &[
    "could of", "would of", "should of", "your welcome", "your the", "i is", "me and him is",
];

const FR_SLIPS: &[&str] = &[
    "jai", "jsuis", "chui", "koi", "pk", "pq", "bcp", "tkt", "stp", "svp", "slt", "cc", "parceque",
    "ki", "kan", "ya",
];

const FR_SLIP_PHRASES: &[&str] = &["sa va", "quand meme", "malgres que", "si il"];

/// Score the writing quality of a biography.
pub fn assess(text: &str) -> BioQuality {
    let words = words(text);
    let word_count = words.len();
    let sentences = sentence_starts(text);
    let sentence_count = sentences.len();
    let has_punctuation = text.chars().any(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'));

    let capitalization_ratio = if sentence_count == 0 {
        0.0
    } else {
        sentences.iter().filter(|c| c.is_uppercase()).count() as f64 / sentence_count as f64
    };

    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    let caps_ratio = if letters == 0 {
        0.0
    } else {
        text.chars().filter(|c| c.is_uppercase()).count() as f64 / letters as f64
    };

    let language = detect_language(&words);
    let error_count = count_slips(&words, language);

    let mut quality = BioQuality {
        word_count,
        sentence_count,
        has_punctuation,
        capitalization_ratio,
        error_count,
        caps_ratio,
        language,
        score: 0,
        well_written: false,
        exempt: word_count < MIN_WORDS,
    };
    if quality.exempt {
        return quality;
    }

    let mut score = 0;
    if word_count >= 15 {
        score += 2;
    }
    if sentence_count >= 2 {
        score += 2;
    }
    score += if has_punctuation { 2 } else { -2 };
    if sentence_count > 0 {
        score += if capitalization_ratio >= 0.8 {
            2
        } else if capitalization_ratio >= 0.5 {
            1
        } else {
            -1
        };
    }
    score += match error_count {
        0 => 2,
        1 => 0,
        n => -2 * (n as i32 - 1),
    };
    if caps_ratio >= 0.5 {
        score -= 4;
    }

    quality.score = score.clamp(-10, 10);
    quality.well_written = word_count >= 15
        && sentence_count >= 2
        && has_punctuation
        && error_count <= 1
        && caps_ratio < 0.5;
    quality
}

/// Lowercased word tokens; apostrophes split words (`c'est` → `c`, `est`).
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// First alphabetic character of every sentence.
fn sentence_starts(text: &str) -> Vec<char> {
    text.split(['.', '!', '?', '\n'])
        .filter_map(|s| s.chars().find(|c| c.is_alphabetic()))
        .collect()
}

fn detect_language(words: &[String]) -> Language {
    let en = words.iter().filter(|w| EN_STOP_WORDS.contains(&w.as_str())).count();
    let fr = words.iter().filter(|w| FR_STOP_WORDS.contains(&w.as_str())).count();
    if fr > en {
        Language::French
    } else {
        Language::English
    }
}

fn count_slips(words: &[String], language: Language) -> usize {
    let (single, phrases) = match language {
        Language::English => (EN_SLIPS, EN_SLIP_PHRASES),
        Language::French => (FR_SLIPS, FR_SLIP_PHRASES),
    };
    let singles = words.iter().filter(|w| single.contains(&w.as_str())).count();
    let joined = format!(" {} ", words.join(" "));
    let multi: usize = phrases
        .iter()
        .map(|p| joined.matches(&format!(" {p} ")).count())
        .sum();
    singles + multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bio_is_exempt() {
        let q = assess("Photographer. Paris.");
        assert!(q.exempt);
        assert!(!q.well_written);
        assert_eq!(q.score, 0);
    }

    #[test]
    fn clean_english_bio_is_well_written() {
        let q = assess(
            "Landscape photographer based in the Alps. I share my favourite hikes and the stories behind each picture.",
        );
        assert!(!q.exempt);
        assert_eq!(q.language, Language::English);
        assert_eq!(q.error_count, 0);
        assert!(q.well_written);
        assert_eq!(q.score, 10);
    }

    #[test]
    fn shouting_bio_is_penalized() {
        let q = assess("BEST DEALS EVER BUY NOW FROM US TODAY ONLY AND TOMORROW TOO");
        assert!(q.caps_ratio > 0.9);
        assert!(!q.well_written);
        assert!(q.score < 0);
    }

    #[test]
    fn french_slips_are_counted() {
        let q = assess("jsuis la pour vous et jai bcp de choses a dire sur la vie tkt");
        assert_eq!(q.language, Language::French);
        assert_eq!(q.error_count, 4);
    }
}
