// Wire types for upstream JSON responses and their conversion into the
// crate's records.
//
// Upstream fields are frequently null or missing, so every wire field is
// optional and defaults are applied during conversion. Numeric ids arrive
// as either JSON numbers or strings.

use serde::Deserialize;
use serde_json::Value;

use super::error::FetchError;
use super::traits::FollowerPage;
use crate::impersonation::SearchHit;
use crate::profile::{AccountInfo, AccountType, ContactHints, MediaRef, Profile};
use crate::scoring::follower::FollowerRecord;

// -- web_profile_info --

#[derive(Debug, Deserialize)]
struct WebProfileResponse {
    data: Option<WebProfileData>,
}

#[derive(Debug, Deserialize)]
struct WebProfileData {
    user: Option<WireUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUser {
    id: Option<Value>,
    username: Option<String>,
    full_name: Option<String>,
    biography: Option<String>,
    external_url: Option<String>,
    bio_links: Option<Vec<WireBioLink>>,
    profile_pic_url: Option<String>,
    profile_pic_url_hd: Option<String>,
    profile_pic_id: Option<Value>,
    is_private: Option<bool>,
    is_verified: Option<bool>,
    is_business_account: Option<bool>,
    category_name: Option<String>,
    business_category_name: Option<String>,
    business_email: Option<String>,
    business_phone_number: Option<String>,
    edge_followed_by: Option<WireCount>,
    edge_follow: Option<WireCount>,
    edge_owner_to_timeline_media: Option<WireMedia>,
    edge_highlight_reels: Option<WireCount>,
    highlight_reel_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireBioLink {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCount {
    count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireMedia {
    count: Option<u64>,
    edges: Option<Vec<WireEdge>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireEdge {
    node: Option<WireNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireNode {
    id: Option<Value>,
    taken_at_timestamp: Option<i64>,
}

/// Parse a `web_profile_info` body. A null `data.user` means the account
/// does not exist.
pub fn parse_profile(body: &str, username: &str) -> Result<Profile, FetchError> {
    let response: WebProfileResponse = serde_json::from_str(body)?;
    let user = response
        .data
        .and_then(|d| d.user)
        .ok_or(FetchError::NotFound)?;

    let posts = user
        .edge_owner_to_timeline_media
        .as_ref()
        .and_then(|m| m.edges.as_ref())
        .map(|edges| {
            edges
                .iter()
                .filter_map(|e| e.node.as_ref())
                .filter_map(|n| {
                    id_string(n.id.as_ref()).map(|id| MediaRef {
                        id,
                        taken_at: n.taken_at_timestamp,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let highlights = user
        .edge_highlight_reels
        .as_ref()
        .and_then(|c| c.count)
        .or(user.highlight_reel_count)
        .unwrap_or(0);

    Ok(Profile {
        username: user.username.unwrap_or_else(|| username.to_string()),
        user_id: id_string(user.id.as_ref()),
        full_name: user.full_name,
        biography: user.biography,
        external_url: user.external_url,
        bio_links: user
            .bio_links
            .unwrap_or_default()
            .into_iter()
            .filter_map(|l| l.url)
            .filter(|u| !u.trim().is_empty())
            .collect(),
        profile_pic_url: user.profile_pic_url_hd.or(user.profile_pic_url),
        profile_pic_id: id_string(user.profile_pic_id.as_ref()),
        follower_count: user.edge_followed_by.and_then(|c| c.count),
        following_count: user.edge_follow.and_then(|c| c.count),
        post_count: user.edge_owner_to_timeline_media.and_then(|m| m.count),
        is_private: user.is_private.unwrap_or(false),
        is_verified: user.is_verified.unwrap_or(false),
        is_business: user.is_business_account.unwrap_or(false),
        business_category: user.category_name.or(user.business_category_name),
        business_email: user.business_email,
        business_phone: user.business_phone_number,
        has_highlight_reels: highlights > 0,
        posts,
    })
}

// -- users/lookup --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireLookup {
    obfuscated_email: Option<String>,
    obfuscated_phone: Option<String>,
    status: Option<String>,
}

pub fn parse_contact_hints(body: &str) -> Result<ContactHints, FetchError> {
    let lookup: WireLookup = serde_json::from_str(body)?;
    Ok(ContactHints {
        email: lookup.obfuscated_email.filter(|e| !e.trim().is_empty()),
        phone: lookup.obfuscated_phone.filter(|p| !p.trim().is_empty()),
        status: lookup.status,
    })
}

// -- users/search --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSearch {
    users: Option<Vec<WireSearchUser>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireSearchUser {
    username: Option<String>,
    full_name: Option<String>,
    follower_count: Option<u64>,
    is_verified: Option<bool>,
    profile_pic_id: Option<Value>,
    account_type: Option<u64>,
}

/// Parse a name-search body, in upstream ranking order.
pub fn parse_search(body: &str) -> Result<Vec<SearchHit>, FetchError> {
    let search: WireSearch = serde_json::from_str(body)?;
    Ok(search
        .users
        .unwrap_or_default()
        .into_iter()
        .filter_map(|u| {
            Some(SearchHit {
                username: u.username?,
                full_name: u.full_name,
                follower_count: u.follower_count.unwrap_or(0),
                is_verified: u.is_verified.unwrap_or(false),
                profile_pic_id: id_string(u.profile_pic_id.as_ref()),
            })
        })
        .collect())
}

/// Account type of the exact `username` match in a search body.
pub fn parse_search_account_type(
    body: &str,
    username: &str,
) -> Result<Option<AccountType>, FetchError> {
    let search: WireSearch = serde_json::from_str(body)?;
    Ok(search
        .users
        .unwrap_or_default()
        .into_iter()
        .find(|u| u.username.as_deref() == Some(username))
        .and_then(|u| u.account_type)
        .and_then(AccountType::from_code))
}

// -- users/{id}/info --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInfo {
    user: Option<WireInfoUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireInfoUser {
    city_name: Option<String>,
    public_email: Option<String>,
    public_phone_number: Option<String>,
    public_phone_country_code: Option<Value>,
    account_type: Option<u64>,
}

/// Parse a user-info body. A body without `user` yields empty details.
pub fn parse_account_info(body: &str) -> Result<AccountInfo, FetchError> {
    let info: WireInfo = serde_json::from_str(body)?;
    let Some(user) = info.user else {
        return Ok(AccountInfo::default());
    };

    let phone = user
        .public_phone_number
        .filter(|p| !p.trim().is_empty())
        .map(|number| match id_string(user.public_phone_country_code.as_ref()) {
            Some(code) if !number.starts_with('+') => format!("+{code} {number}"),
            _ => number,
        });

    Ok(AccountInfo {
        city: user.city_name.filter(|c| !c.trim().is_empty()),
        public_email: user.public_email.filter(|e| !e.trim().is_empty()),
        public_phone: phone,
        account_type: user.account_type.and_then(AccountType::from_code),
    })
}

// -- friendships/{id}/followers --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireFollowers {
    users: Option<Vec<WireFollower>>,
    next_max_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireFollower {
    pk: Option<Value>,
    id: Option<Value>,
    username: Option<String>,
    full_name: Option<String>,
    is_private: Option<bool>,
    is_verified: Option<bool>,
    has_anonymous_profile_picture: Option<bool>,
    profile_pic_url: Option<String>,
}

/// Parse a follower page. A body without a `users` array is malformed.
pub fn parse_followers_page(body: &str) -> Result<FollowerPage, FetchError> {
    let page: WireFollowers = serde_json::from_str(body)?;
    let users = page
        .users
        .ok_or_else(|| FetchError::Parse("follower page has no users array".to_string()))?;

    let followers = users
        .into_iter()
        .filter_map(|u| {
            Some(FollowerRecord {
                user_id: id_string(u.pk.as_ref()).or_else(|| id_string(u.id.as_ref())),
                username: u.username?,
                full_name: u.full_name,
                is_private: u.is_private.unwrap_or(false),
                is_verified: u.is_verified.unwrap_or(false),
                has_anonymous_profile_picture: u.has_anonymous_profile_picture.unwrap_or(false),
                profile_pic_url: u.profile_pic_url,
            })
        })
        .collect();

    Ok(FollowerPage {
        followers,
        next_cursor: id_string(page.next_max_id.as_ref()),
    })
}

/// Numeric ids come back as numbers or strings; blank strings are absent.
fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
