// Colored terminal output for profile reports and follower scans.
//
// All terminal-specific formatting lives here; main.rs only decides which
// report to print.

use colored::Colorize;

use super::{format_count, truncate_chars};
use crate::bio::{BioAnalysis, BioRisk, Language};
use crate::contact::{EmailAnalysis, PhoneAnalysis};
use crate::impersonation::ImpersonationCheck;
use crate::pipeline::followers::ScanResult;
use crate::profile::analysis::AnalyzedProfile;
use crate::profile::{AccountInfo, Profile};
use crate::scoring::follower::{FollowerAnalysis, FollowerTier};
use crate::scoring::trust::{TrustDetail, TrustReport, Verdict};

/// Followers listed per tier before the rest are summarized.
const MAX_LISTED: usize = 25;

/// Print the full report for one analyzed profile.
pub fn display_report(report: &AnalyzedProfile) {
    let profile = &report.profile;
    let analysis = &report.analysis;

    display_profile(profile);

    if analysis.phone.is_some() || analysis.email.is_some() || analysis.business_phone.is_some() {
        println!("\n{}", "Contact".bold());
        if let Some(phone) = &analysis.phone {
            display_phone("Phone", phone);
        }
        if let Some(phone) = &analysis.business_phone {
            display_phone("Business phone", phone);
        }
        if let Some(email) = &analysis.email {
            display_email(email);
        }
    }

    if let Some(info) = &analysis.account_info {
        display_account_info(info);
    }

    if let Some(bio) = &analysis.bio {
        display_bio(bio);
    }

    println!("\n{}", "Account age".bold());
    let methods: Vec<_> = analysis.age.methods().collect();
    if methods.is_empty() {
        println!("  {}", "No estimate available".dimmed());
    }
    for method in methods {
        println!(
            "  {:<12} {:<10} {}",
            method.source.label(),
            method.date,
            format!("({}%)", method.confidence).dimmed()
        );
    }
    if let Some(best) = &analysis.age.best {
        println!(
            "  {} {} via {}",
            "Best:".bold(),
            best.date,
            best.source.label()
        );
    }

    if let Some(check) = &analysis.impersonation {
        display_impersonation(check);
    }

    if !analysis.reverse_image.is_empty() {
        println!("\n{}", "Reverse image search".bold());
        for link in &analysis.reverse_image {
            println!("  {:<12} {}", link.engine, link.url.dimmed());
        }
    }

    for missing in &analysis.unavailable {
        println!(
            "\n  {} {} unavailable: {}",
            "?".yellow(),
            missing.signal,
            missing.reason.dimmed()
        );
    }

    display_trust(&report.trust);
}

fn display_profile(profile: &Profile) {
    println!(
        "\n{}",
        format!("=== Profile @{} ===", profile.username).bold()
    );
    if let Some(name) = profile.display_name() {
        println!("  Name: {name}");
    }
    if let Some(id) = &profile.user_id {
        println!("  User ID: {id}");
    }

    let count = |n: Option<u64>| n.map(format_count).unwrap_or_else(|| "?".to_string());
    println!(
        "  Followers: {}  Following: {}  Posts: {}",
        count(profile.follower_count),
        count(profile.following_count),
        count(profile.post_count)
    );

    let mut flags = Vec::new();
    if profile.is_verified {
        flags.push("verified".blue().to_string());
    }
    if profile.is_private {
        flags.push("private".yellow().to_string());
    }
    if profile.is_business {
        let category = profile.business_category.as_deref().unwrap_or("business");
        flags.push(category.cyan().to_string());
    }
    if !flags.is_empty() {
        println!("  {}", flags.join("  "));
    }
    for link in profile.links() {
        println!("  Link: {}", truncate_chars(link, 80));
    }
}

fn display_phone(label: &str, phone: &PhoneAnalysis) {
    let raw = phone.raw.as_deref().unwrap_or("?");
    let Some(country) = &phone.country else {
        println!("  {label}: {raw} {}", "(country unknown)".dimmed());
        return;
    };
    let tier = phone
        .risk_level
        .map(|r| colorize_tier(r.as_str()).to_string())
        .unwrap_or_default();
    println!("  {label}: {raw} → {country} {tier}");

    let mut hints = Vec::new();
    if let Some(kind) = phone.phone_type {
        hints.push(kind.as_str().to_string());
    }
    if let Some(format) = &phone.phone_format {
        hints.push(format!("format {format}"));
    }
    if let Some(carrier) = &phone.carrier_hint {
        hints.push(carrier.clone());
    }
    if let Some(range) = &phone.operator_range {
        hints.push(range.clone());
    }
    if let Some(confidence) = phone.confidence {
        hints.push(format!("{confidence} confidence"));
    }
    if !hints.is_empty() {
        println!("    {}", hints.join(", ").dimmed());
    }
}

fn display_email(email: &EmailAnalysis) {
    let raw = email.raw.as_deref().unwrap_or("?");
    match (&email.provider, &email.provider_confidence) {
        (Some(provider), Some(confidence)) => {
            println!("  Email: {raw} → {provider} ({confidence} confidence)")
        }
        _ => println!("  Email: {raw}"),
    }

    let mut hints = Vec::new();
    if let Some(kind) = email.provider_kind {
        hints.push(kind.as_str().to_string());
    }
    if let Some(domain_type) = email.domain_type {
        hints.push(domain_type.as_str().to_string());
    }
    if let Some(level) = email.security_level {
        hints.push(format!("{} security", level.as_str()));
    }
    if let Some(length) = &email.length_estimate {
        hints.push(length.clone());
    }
    if !hints.is_empty() {
        println!("    {}", hints.join(", ").dimmed());
    }
}

fn display_account_info(info: &AccountInfo) {
    println!("\n{}", "Public details".bold());
    if let Some(city) = &info.city {
        println!("  Location: {}", city.green());
    }
    if let Some(email) = &info.public_email {
        println!("  Public email: {}", email.green());
    }
    if let Some(phone) = &info.public_phone {
        println!("  Public phone: {}", phone.green());
    }
    if let Some(kind) = info.account_type {
        println!("  Account type: {}", kind.label());
    }
}

fn display_bio(bio: &BioAnalysis) {
    println!("\n{}", "Bio".bold());
    let language = match bio.quality.language {
        Language::English => "en",
        Language::French => "fr",
    };
    let quality = if bio.quality.exempt {
        "short, not rated".dimmed().to_string()
    } else if bio.quality.well_written {
        format!("well written ({})", bio.quality.score).green().to_string()
    } else {
        format!("quality {}", bio.quality.score).normal().to_string()
    };
    println!(
        "  {} words, {}  {}",
        bio.quality.word_count,
        quality,
        format!("[{language}]").dimmed()
    );

    if let Some(risk) = bio.risk_level {
        let label = format!("Scam risk: {risk} ({} pts)", bio.scam_points);
        let label = match risk {
            BioRisk::High => label.red().bold(),
            BioRisk::Moderate => label.yellow(),
            BioRisk::Low => label.normal(),
        };
        println!("  {label}");
        for indicator in &bio.indicators {
            println!("    - {} (+{})", indicator.label, indicator.points);
        }
    }
    for phrase in &bio.fake_phrases {
        println!("  {} \"{}\"", "Self-declared:".yellow(), phrase);
    }
    for email in &bio.emails {
        println!("  Email in bio: {email}");
    }
    for phone in &bio.phones {
        println!("  Phone in bio: {phone}");
    }
}

fn display_impersonation(check: &ImpersonationCheck) {
    if !check.is_impersonation {
        return;
    }
    println!("\n{}", "Impersonation".red().bold());
    if let Some(warning) = &check.warning {
        println!("  {}", warning.red());
    }
    if let Some(matched) = &check.matched {
        println!(
            "  Resembles @{} ({} followers{}), name {:.0}%, username {:.0}%",
            matched.username,
            format_count(matched.follower_count),
            if matched.is_verified { ", verified" } else { "" },
            matched.name_similarity * 100.0,
            matched.username_similarity * 100.0
        );
    }
    if check.avatar_reused {
        println!("  {}", "Same profile picture as the matched account".red());
    }
}

fn display_trust(trust: &TrustReport) {
    println!("\n{}", "=== Trust ===".bold());
    let filled = usize::from(trust.score) / 5;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
    println!(
        "  {} {}/100  {}",
        colorize_verdict(trust.verdict, &bar),
        trust.score,
        colorize_verdict(trust.verdict, trust.verdict.label()).bold()
    );

    display_details("Positive", &trust.positive());
    display_details("Neutral", &trust.neutral());
    display_details("Negative", &trust.negative());
}

fn display_details(heading: &str, details: &[&TrustDetail]) {
    if details.is_empty() {
        return;
    }
    println!("\n  {}", heading.dimmed());
    for detail in details {
        let delta = format!("{:+}", detail.delta);
        let delta = match detail.delta {
            d if d > 0 => delta.green(),
            d if d < 0 => delta.red(),
            _ => delta.dimmed(),
        };
        println!("    {:>4}  {}", delta, detail.label);
    }
}

/// Print the outcome of a follower scan.
pub fn display_scan(result: &ScanResult) {
    if let Some(message) = &result.error_message {
        println!("{} {}", "Scan failed:".red().bold(), message);
        if result.total == 0 {
            return;
        }
    }

    let title = if result.cancelled {
        format!(
            "=== Follower Scan (cancelled, {} followers) ===",
            result.total
        )
    } else {
        format!("=== Follower Scan ({} followers) ===", result.total)
    };
    println!("\n{}", title.bold());
    println!(
        "  Pages: {}  High: {}  Suspicious: {}  Normal: {}",
        result.pages_fetched,
        result.high_count.to_string().red(),
        result.suspicious_count.to_string().yellow(),
        result.normal_count.to_string().green()
    );

    display_followers(FollowerTier::High, &result.high_risk);
    display_followers(FollowerTier::Suspicious, &result.suspicious);

    for warning in &result.warnings {
        println!("\n  {} {}", "!".yellow(), warning);
    }
}

fn display_followers(tier: FollowerTier, followers: &[FollowerAnalysis]) {
    if followers.is_empty() {
        return;
    }
    println!("\n  {} ({})", colorize_tier(tier.as_str()), followers.len());
    for follower in followers.iter().take(MAX_LISTED) {
        let age = follower
            .age_band
            .map(|b| format!(" [{b}]"))
            .unwrap_or_default();
        println!(
            "    {:>3}  @{:<30}{}  {}",
            follower.risk_score,
            follower.username,
            age.dimmed(),
            follower.flags.join(", ").dimmed()
        );
    }
    if followers.len() > MAX_LISTED {
        println!(
            "    {}",
            format!("... and {} more", followers.len() - MAX_LISTED).dimmed()
        );
    }
}

fn colorize_verdict(verdict: Verdict, text: &str) -> colored::ColoredString {
    match verdict {
        Verdict::HighlyTrustworthy | Verdict::LikelyLegitimate => text.green(),
        Verdict::Moderate => text.normal(),
        Verdict::LowConfidence => text.yellow(),
        Verdict::Suspicious => text.bright_red(),
        Verdict::HighRisk => text.red(),
    }
}

/// Colorize a risk tier string (phone geography or follower tier).
pub fn colorize_tier(tier: &str) -> colored::ColoredString {
    match tier {
        "very_high" | "high" => tier.red().bold(),
        "suspicious" | "moderate" => tier.yellow(),
        "normal" | "trusted" => tier.green(),
        _ => tier.dimmed(),
    }
}
