// Impersonation detection.
//
// Searches for accounts sharing the subject's display name and asks whether
// one of them looks like "the real account": verified or far more followed,
// with a similar name. The subject is flagged when that account dwarfs it.

pub mod reverse_image;
pub mod similarity;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// How many search results are considered.
pub const TOP_RESULTS: usize = 10;
/// Minimum follower multiple for an unverified hit to count as the real account.
pub const POPULAR_MULTIPLE: u64 = 10;
/// Minimum follower multiple of the winner over the subject to flag impersonation.
pub const IMPERSONATION_MULTIPLE: u64 = 5;
pub const NAME_THRESHOLD: f64 = 0.7;
pub const USERNAME_THRESHOLD: f64 = 0.6;

/// One account returned by the name-search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub username: String,
    pub full_name: Option<String>,
    pub follower_count: u64,
    pub is_verified: bool,
    pub profile_pic_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedAccount {
    pub username: String,
    pub full_name: Option<String>,
    pub follower_count: u64,
    pub is_verified: bool,
    pub name_similarity: f64,
    pub username_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpersonationCheck {
    pub is_impersonation: bool,
    /// The account judged to be the real one, if any was accepted.
    pub matched: Option<MatchedAccount>,
    /// The real account exposes the same avatar identifier as the subject.
    pub avatar_reused: bool,
    pub warning: Option<String>,
}

/// Query the name search with this, or skip the check when `None`.
///
/// Verified subjects are the real account by definition and blank
/// display names give nothing to search for.
pub fn search_query(profile: &Profile) -> Option<&str> {
    if profile.is_verified {
        return None;
    }
    profile.display_name()
}

/// Judge the subject against search results for its display name.
pub fn detect(profile: &Profile, hits: &[SearchHit]) -> ImpersonationCheck {
    let subject_followers = profile.follower_count.unwrap_or(0);
    let name = profile.display_name().unwrap_or("");

    let winner = hits
        .iter()
        .filter(|h| !h.username.eq_ignore_ascii_case(&profile.username))
        .take(TOP_RESULTS)
        .filter_map(|h| {
            let name_similarity = h
                .full_name
                .as_deref()
                .map(|n| similarity::similarity(name, n))
                .unwrap_or(0.0);
            let username_similarity = similarity::similarity(&profile.username, &h.username);

            let popular = h.is_verified
                || h.follower_count >= subject_followers.saturating_mul(POPULAR_MULTIPLE).max(1);
            let similar = name_similarity > NAME_THRESHOLD || username_similarity > USERNAME_THRESHOLD;
            (popular && similar).then_some((h, name_similarity, username_similarity))
        })
        .max_by_key(|(h, _, _)| h.follower_count);

    let Some((hit, name_similarity, username_similarity)) = winner else {
        return ImpersonationCheck {
            is_impersonation: false,
            matched: None,
            avatar_reused: false,
            warning: None,
        };
    };

    let is_impersonation =
        hit.follower_count >= subject_followers.saturating_mul(IMPERSONATION_MULTIPLE).max(1);
    let avatar_reused = match (&hit.profile_pic_id, &profile.profile_pic_id) {
        (Some(theirs), Some(ours)) => !ours.trim().is_empty() && theirs == ours,
        _ => false,
    };

    let warning = is_impersonation.then(|| {
        if hit.is_verified {
            format!(
                "Possible impersonation of verified account @{} ({} followers)",
                hit.username, hit.follower_count
            )
        } else {
            format!(
                "Possible impersonation of popular account @{} ({} followers)",
                hit.username, hit.follower_count
            )
        }
    });

    ImpersonationCheck {
        is_impersonation,
        matched: Some(MatchedAccount {
            username: hit.username.clone(),
            full_name: hit.full_name.clone(),
            follower_count: hit.follower_count,
            is_verified: hit.is_verified,
            name_similarity,
            username_similarity,
        }),
        avatar_reused,
        warning,
    }
}
