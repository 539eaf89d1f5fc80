// Collaborator traits — the seams between the analysis core and the network.
//
// `UpstreamClient` implements all of them against the live service; tests
// implement them with in-memory fakes.

use async_trait::async_trait;

use super::error::FetchError;
use super::session::Session;
use crate::impersonation::SearchHit;
use crate::profile::{AccountInfo, ContactHints, Profile};
use crate::scoring::follower::FollowerRecord;

/// Fetch the raw profile of an account.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError>;
}

/// Fetch the masked email/phone exposed by the account-recovery lookup.
#[async_trait]
pub trait ContactHintSource: Send + Sync {
    async fn fetch_contact_hints(&self, username: &str) -> Result<ContactHints, FetchError>;
}

/// Fetch the public details of an account (city, public email and phone,
/// account type). `Ok(None)` means the account exposes none of them.
#[async_trait]
pub trait AccountInfoSource: Send + Sync {
    async fn fetch_account_info(
        &self,
        username: &str,
        user_id: Option<&str>,
    ) -> Result<Option<AccountInfo>, FetchError>;
}

/// Search accounts by display name.
#[async_trait]
pub trait NameSearch: Send + Sync {
    async fn search_by_name(&self, query: &str) -> Result<Vec<SearchHit>, FetchError>;
}

/// One page of a follower listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowerPage {
    pub followers: Vec<FollowerRecord>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// Paginated follower listing. Requires an authenticated session.
#[async_trait]
pub trait FollowerSource: Send + Sync {
    async fn fetch_followers_page(
        &self,
        session: &Session,
        user_id: &str,
        cursor: Option<&str>,
    ) -> Result<FollowerPage, FetchError>;
}
