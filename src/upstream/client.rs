// Upstream HTTP client — profile, contact-hint, account-info, search and
// follower endpoints.
//
// A thin reqwest wrapper with one generic GET helper. HTTP statuses map to
// FetchError; 429s are retried with backoff under a shared sliding-window
// limiter. Nothing here interprets the data beyond parsing it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::error::FetchError;
use super::parse;
use super::rate_limit::{with_retry, RateLimiter};
use super::session::Session;
use super::traits::{
    AccountInfoSource, ContactHintSource, FollowerPage, FollowerSource, NameSearch, ProfileSource,
};
use crate::config::Config;
use crate::impersonation::SearchHit;
use crate::profile::{AccountInfo, ContactHints, Profile};

const WEB_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/131.0.0.0 Safari/537.36";
const MOBILE_USER_AGENT: &str = "Instagram 275.0.0.27.98 Android";
const WEB_APP_ID: &str = "936619743392459";
const FOLLOWERS_PAGE_SIZE: &str = "100";

/// Live implementation of every upstream collaborator trait.
pub struct UpstreamClient {
    client: reqwest::Client,
    web_base: String,
    mobile_base: String,
    limiter: Arc<RateLimiter>,
}

impl UpstreamClient {
    pub fn new(web_base: &str, mobile_base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            web_base: web_base.trim_end_matches('/').to_string(),
            mobile_base: mobile_base.trim_end_matches('/').to_string(),
            // ~200 requests per hour, at least one second apart.
            limiter: Arc::new(RateLimiter::new(
                200,
                Duration::from_secs(3600),
                Duration::from_secs(1),
            )),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.web_api_url, &config.mobile_api_url, config.timeout)
    }

    /// GET `url` and return the body, mapping non-success statuses to FetchError.
    async fn get_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, String)],
    ) -> Result<String, FetchError> {
        with_retry(&self.limiter, || async move {
            debug!(url = url, "upstream GET");
            let mut request = self.client.get(url).query(params);
            for (name, value) in headers {
                request = request.header(*name, value);
            }
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::from_status(status.as_u16()));
            }
            Ok(response.text().await?)
        })
        .await
    }

    async fn post_form_text(&self, url: &str, form: &[(&str, String)]) -> Result<String, FetchError> {
        with_retry(&self.limiter, || async move {
            debug!(url = url, "upstream POST");
            let response = self
                .client
                .post(url)
                .header(reqwest::header::USER_AGENT, MOBILE_USER_AGENT)
                .form(form)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::from_status(status.as_u16()));
            }
            Ok(response.text().await?)
        })
        .await
    }
}

#[async_trait]
impl ProfileSource for UpstreamClient {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        let url = format!("{}/api/v1/users/web_profile_info/", self.web_base);
        let headers = [
            ("user-agent", WEB_USER_AGENT.to_string()),
            ("x-ig-app-id", WEB_APP_ID.to_string()),
            ("x-requested-with", "XMLHttpRequest".to_string()),
            ("referer", format!("{}/{username}/", self.web_base)),
        ];
        let body = self
            .get_text(&url, &[("username", username)], &headers)
            .await?;
        parse::parse_profile(&body, username)
    }
}

#[async_trait]
impl ContactHintSource for UpstreamClient {
    async fn fetch_contact_hints(&self, username: &str) -> Result<ContactHints, FetchError> {
        let url = format!("{}/api/v1/users/lookup/", self.mobile_base);
        let signed = serde_json::json!({ "q": username, "ig_sig_key_version": "4" });
        let form = [
            ("ig_sig_key_version", "4".to_string()),
            ("signed_body", format!("SIGNATURE.{signed}")),
        ];
        let body = self.post_form_text(&url, &form).await?;
        parse::parse_contact_hints(&body)
    }
}

#[async_trait]
impl AccountInfoSource for UpstreamClient {
    async fn fetch_account_info(
        &self,
        username: &str,
        user_id: Option<&str>,
    ) -> Result<Option<AccountInfo>, FetchError> {
        let headers = [("user-agent", MOBILE_USER_AGENT.to_string())];

        let mut info = match user_id {
            Some(id) => {
                let url = format!("{}/api/v1/users/{id}/info/", self.mobile_base);
                let body = self.get_text(&url, &[], &headers).await?;
                parse::parse_account_info(&body)?
            }
            None => AccountInfo::default(),
        };

        // Search results carry the account type when user info does not.
        if info.account_type.is_none() {
            let url = format!("{}/api/v1/users/search/", self.mobile_base);
            let body = self.get_text(&url, &[("q", username)], &headers).await?;
            info.account_type = parse::parse_search_account_type(&body, username)?;
        }

        Ok((!info.is_empty()).then_some(info))
    }
}

#[async_trait]
impl NameSearch for UpstreamClient {
    async fn search_by_name(&self, query: &str) -> Result<Vec<SearchHit>, FetchError> {
        let url = format!("{}/api/v1/users/search/", self.mobile_base);
        let headers = [("user-agent", MOBILE_USER_AGENT.to_string())];
        let body = self.get_text(&url, &[("q", query)], &headers).await?;
        parse::parse_search(&body)
    }
}

#[async_trait]
impl FollowerSource for UpstreamClient {
    async fn fetch_followers_page(
        &self,
        session: &Session,
        user_id: &str,
        cursor: Option<&str>,
    ) -> Result<FollowerPage, FetchError> {
        let url = format!("{}/api/v1/friendships/{user_id}/followers/", self.mobile_base);
        let headers = [
            ("user-agent", MOBILE_USER_AGENT.to_string()),
            ("cookie", format!("sessionid={}", session.session_id())),
        ];
        let mut params = vec![("count", FOLLOWERS_PAGE_SIZE)];
        if let Some(cursor) = cursor {
            params.push(("max_id", cursor));
        }
        let body = self.get_text(&url, &params, &headers).await?;
        parse::parse_followers_page(&body)
    }
}
