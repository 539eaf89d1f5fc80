// Unit tests for the bio analyzer.
//
// Covers contact extraction, scam-indicator matching and tiers, fake-bio
// phrases, and the writing-quality score in both languages.

use trustlens::bio::quality::{assess, MIN_WORDS};
use trustlens::bio::scam::{SHORTENED_URL_LABEL, SHORTENED_URL_POINTS};
use trustlens::bio::{analyze_bio, extract_emails, extract_phones, extract_urls, BioRisk, Language};

// ============================================================
// Extraction
// ============================================================

#[test]
fn extracts_email_phone_and_url() {
    let bio = "Bookings: jane.doe@example.com or +33 6 12 34 56 78, site www.janedoe.net";
    assert_eq!(extract_emails(bio), vec!["jane.doe@example.com"]);
    assert_eq!(extract_phones(bio), vec!["+33 6 12 34 56 78"]);
    assert_eq!(extract_urls(bio), vec!["www.janedoe.net"]);
}

#[test]
fn email_domain_is_not_a_url() {
    assert!(extract_urls("write to me at jane@example.com").is_empty());
}

#[test]
fn short_digit_runs_are_not_phones() {
    assert!(extract_phones("Class of 2019, room 12-345").is_empty());
}

#[test]
fn domain_suffix_must_end_the_word() {
    assert!(extract_urls("Intern at example.company, fan of foo.network").is_empty());
    assert_eq!(extract_urls("Prints at janedoe.shop today"), vec!["janedoe.shop"]);
}

#[test]
fn trailing_punctuation_is_stripped_from_urls() {
    assert_eq!(
        extract_urls("My shop: https://example.com/store."),
        vec!["https://example.com/store"]
    );
}

// ============================================================
// Scam indicators
// ============================================================

#[test]
fn urgency_and_contact_request_is_moderate_or_worse() {
    let analysis = analyze_bio("act now, limited time, dm me");
    assert!(matches!(
        analysis.risk_level,
        Some(BioRisk::Moderate) | Some(BioRisk::High)
    ));
    let labels: Vec<&str> = analysis.labels().collect();
    assert!(labels.len() >= 2, "labels: {labels:?}");
    assert!(labels.contains(&"Urgency tactics"));
    assert!(labels.contains(&"Contact request"));
}

#[test]
fn blank_bio_has_no_indicators() {
    for text in ["", "   "] {
        let analysis = analyze_bio(text);
        assert!(analysis.indicators.is_empty());
        assert_eq!(analysis.risk_level, None);
        assert_eq!(analysis.scam_points, 0);
    }
}

#[test]
fn each_category_counts_once() {
    let analysis = analyze_bio("crypto crypto crypto bitcoin forex");
    assert_eq!(analysis.indicators.len(), 1);
    assert_eq!(analysis.scam_points, 15);
    assert_eq!(analysis.risk_level, Some(BioRisk::Low));
}

#[test]
fn stacked_categories_reach_high() {
    let analysis = analyze_bio(
        "Crypto investor. Passive income and financial freedom! Whatsapp me, limited time",
    );
    assert!(analysis.scam_points >= 40);
    assert_eq!(analysis.risk_level, Some(BioRisk::High));
}

#[test]
fn shortener_adds_its_own_indicator() {
    let analysis = analyze_bio("new video bit.ly/3abcde");
    let last = analysis.indicators.last().unwrap();
    assert_eq!(last.label, SHORTENED_URL_LABEL);
    assert_eq!(last.points, SHORTENED_URL_POINTS);
}

#[test]
fn risk_tier_boundaries() {
    assert_eq!(BioRisk::from_points(0), None);
    assert_eq!(BioRisk::from_points(1), Some(BioRisk::Low));
    assert_eq!(BioRisk::from_points(19), Some(BioRisk::Low));
    assert_eq!(BioRisk::from_points(20), Some(BioRisk::Moderate));
    assert_eq!(BioRisk::from_points(39), Some(BioRisk::Moderate));
    assert_eq!(BioRisk::from_points(40), Some(BioRisk::High));
}

#[test]
fn ordinary_bio_is_clean() {
    let analysis = analyze_bio("Coffee, climbing and film cameras. Based in Lyon.");
    assert!(analysis.indicators.is_empty());
    assert!(analysis.fake_phrases.is_empty());
}

#[test]
fn fake_bio_phrases_are_reported() {
    let analysis = analyze_bio("Fan account. Not affiliated with the artist.");
    assert!(analysis.fake_phrases.contains(&"fan account".to_string()));
    assert!(analysis.fake_phrases.contains(&"not affiliated".to_string()));
}

// ============================================================
// Writing quality
// ============================================================

#[test]
fn under_ten_words_is_exempt() {
    let q = assess("Dog person. Runner. Tea over coffee.");
    assert!(q.word_count < MIN_WORDS);
    assert!(q.exempt);
    assert!(!q.well_written);
}

#[test]
fn clean_french_bio_is_well_written() {
    let q = assess(
        "Je suis photographe à Lyon et je partage mes voyages avec vous. \
         C'est une passion pour la nature et les montagnes depuis toujours.",
    );
    assert_eq!(q.language, Language::French);
    assert_eq!(q.error_count, 0);
    assert_eq!(q.sentence_count, 2);
    assert!(q.well_written);
}

#[test]
fn french_a_and_on_do_not_count_as_english() {
    let q = assess("On a un chien. Elle a une voiture a Paris.");
    assert_eq!(q.language, Language::French);
}

#[test]
fn slips_make_a_bio_poorly_written() {
    let q = assess(
        "I dont know wich way to go but u know im gonna try anyway because life is short.",
    );
    assert_eq!(q.language, Language::English);
    assert_eq!(q.error_count, 5);
    assert!(!q.well_written);
    assert!(q.score < 0);
}

#[test]
fn single_sentence_is_not_well_written() {
    let q = assess(
        "Landscape photographer based in the Alps sharing my favourite hikes and the stories behind each picture",
    );
    assert!(!q.exempt);
    assert_eq!(q.sentence_count, 1);
    assert!(!q.well_written);
}

#[test]
fn quality_score_is_bounded() {
    let texts = [
        "u ur im ive dont cant wanna gonna pls plz alot teh thier wich untill",
        "Landscape photographer based in the Alps. I share my favourite hikes and the stories behind each picture.",
        "ALL CAPS ALL THE TIME BECAUSE WHY NOT, NO RULES HERE AT ALL!!!",
    ];
    for text in texts {
        let q = assess(text);
        assert!((-10..=10).contains(&q.score), "{text}: {}", q.score);
    }
}
