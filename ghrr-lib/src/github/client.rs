//! GitHub API client
//!
//! Minimal GitHub REST client for the endpoints the crawl needs. Every call is
//! classified into an [`ApiResult`]; retrying is left to the caller.

use super::credentials::Credentials;
use super::models::{Collection, OrgRef, Page, RepoSummary, UserProfile, UserRef};
use super::source::{ApiResult, Rejection, UserSource, unwrap_or_return};
use crate::Result;
use crate::crawl::CrawlTarget;
use chrono::{DateTime, Utc};
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "    github";

/// Default base URL of the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Error payload GitHub attaches to non-2xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    page_size: u8,
}

impl Client {
    /// Create a new authenticated client
    pub fn new(credentials: &Credentials, base_url: impl Into<String>, page_size: u8, timeout: Duration) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("token {}", credentials.token()))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .user_agent(format!("ghrr ({})", credentials.user()))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, target: &CrawlTarget, suffix: &str) -> String {
        format!("{}/repos/{}/{}{suffix}", self.base_url, target.owner(), target.name())
    }

    fn paged(&self, url: &str, page: u32) -> String {
        format!("{url}?per_page={}&page={page}", self.page_size)
    }

    /// Make an API call and classify the result
    async fn api_call(&self, url: &str) -> ApiResult<reqwest::Response> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e.into()),
        };

        let status = resp.status();
        if status.is_success() {
            return ApiResult::Success(resp);
        }

        if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
            let reset_at = extract_reset_time(resp.headers());
            let message = error_message(resp, status).await;
            return ApiResult::Rejected(Rejection::new(status.as_u16(), message, reset_at));
        }

        let message = error_message(resp, status).await;
        ApiResult::Failed(ohno::app_err!("GitHub API error ({status}) for '{url}': {message}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let resp = unwrap_or_return!(self.api_call(url).await);

        match resp.json().await {
            Ok(value) => ApiResult::Success(value),
            Err(e) => ApiResult::Failed(e.into()),
        }
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> ApiResult<Page<T>> {
        let resp = unwrap_or_return!(self.api_call(url).await);

        // GitHub answers 204 for the contributors of an empty repository
        if resp.status() == StatusCode::NO_CONTENT {
            return ApiResult::Success(Page::empty());
        }

        let has_next = has_next_page(resp.headers());
        match resp.json::<Vec<T>>().await {
            Ok(items) => ApiResult::Success(Page { items, has_next }),
            Err(e) => ApiResult::Failed(e.into()),
        }
    }
}

impl UserSource for Client {
    async fn repository(&self, target: &CrawlTarget) -> ApiResult<RepoSummary> {
        self.get_json(&self.repo_url(target, "")).await
    }

    async fn user_refs(&self, target: &CrawlTarget, collection: Collection, page: u32) -> ApiResult<Page<UserRef>> {
        let url = self.repo_url(target, &format!("/{}", collection.path()));
        self.get_page(&self.paged(&url, page)).await
    }

    async fn user(&self, login: &str) -> ApiResult<UserProfile> {
        self.get_json(&format!("{}/users/{login}", self.base_url)).await
    }

    async fn user_orgs(&self, login: &str, page: u32) -> ApiResult<Page<OrgRef>> {
        let url = format!("{}/users/{login}/orgs", self.base_url);
        self.get_page(&self.paged(&url, page)).await
    }
}

/// Pull the error message out of a failed response, falling back to the status text
async fn error_message(resp: reqwest::Response, status: StatusCode) -> String {
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    if body.message.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.message
    }
}

/// Extract the quota reset time from API response headers
fn extract_reset_time(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    DateTime::from_timestamp(reset_timestamp, 0)
}

/// Whether the `Link` header advertises a next page
fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get(LINK)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|link_str| link_str.contains(r#"rel="next""#))
}
