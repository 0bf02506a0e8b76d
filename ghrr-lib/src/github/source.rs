//! The abstract paginated user source consumed by the crawl engine.

use super::models::{Collection, OrgRef, Page, RepoSummary, UserProfile, UserRef};
use crate::crawl::CrawlTarget;
use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};

/// Result of a single remote call, classified for the retry machinery.
///
/// Sources never retry or sleep themselves; the caller decides what to do with
/// each outcome.
#[derive(Debug)]
pub enum ApiResult<T> {
    /// The call succeeded
    Success(T),

    /// The service refused the call (HTTP 403/429); may or may not be a quota problem
    Rejected(Rejection),

    /// Any other failure: network, timeout, server error, unexpected status, decode error
    Failed(ohno::AppError),
}

impl<T> ApiResult<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success(value) => ApiResult::Success(f(value)),
            Self::Rejected(rejection) => ApiResult::Rejected(rejection),
            Self::Failed(e) => ApiResult::Failed(e),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Unwrap a successful [`ApiResult`] or return early with the rejection or failure
macro_rules! unwrap_or_return {
    ($expr:expr) => {
        match $expr {
            $crate::github::ApiResult::Success(value) => value,
            $crate::github::ApiResult::Rejected(rejection) => return $crate::github::ApiResult::Rejected(rejection),
            $crate::github::ApiResult::Failed(e) => return $crate::github::ApiResult::Failed(e),
        }
    };
}

pub(crate) use unwrap_or_return;

/// A refused request, as reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub message: String,
    pub reset_at: Option<DateTime<Utc>>,
}

impl Rejection {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, reset_at: Option<DateTime<Utc>>) -> Self {
        Self {
            status,
            message: message.into(),
            reset_at,
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status)
    }
}

/// Source of repository user listings and user profiles.
///
/// Page numbers start at 1. A walk over a listing ends at the first page that is
/// empty or reports no next page.
pub trait UserSource {
    /// Summary counts for the target repository
    fn repository(&self, target: &CrawlTarget) -> impl Future<Output = ApiResult<RepoSummary>>;

    /// One page of a repository's stargazers, subscribers, or contributors
    fn user_refs(&self, target: &CrawlTarget, collection: Collection, page: u32) -> impl Future<Output = ApiResult<Page<UserRef>>>;

    /// The full profile of a single user
    fn user(&self, login: &str) -> impl Future<Output = ApiResult<UserProfile>>;

    /// One page of a user's organization memberships
    fn user_orgs(&self, login: &str, page: u32) -> impl Future<Output = ApiResult<Page<OrgRef>>>;
}
