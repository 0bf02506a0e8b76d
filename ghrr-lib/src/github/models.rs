//! Wire types for the subset of the GitHub REST API that ghrr consumes.
//!
//! Only the fields we need are modeled; serde ignores the rest.

use core::fmt::{Display, Formatter};
use serde::Deserialize;

/// Repository summary returned by `GET /repos/{owner}/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoSummary {
    #[serde(default)]
    pub stargazers_count: Option<i64>,
    #[serde(default)]
    pub subscribers_count: Option<i64>,
}

/// Lightweight reference to a user, as listed by the stargazers/subscribers/contributors endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub login: String,
}

impl UserRef {
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self { login: login.into() }
    }
}

/// Full user profile returned by `GET /users/{login}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub public_repos: u64,
}

/// Organization membership entry returned by `GET /users/{login}/orgs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgRef {
    pub login: String,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self { items, has_next: false }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Whether a page walk should stop after this page.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        !self.has_next || self.items.is_empty()
    }
}

/// The per-repository user collections that can be walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Stargazers,
    Subscribers,
    Contributors,
}

impl Collection {
    /// Path segment below `/repos/{owner}/{name}/`
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Stargazers => "stargazers",
            Self::Subscribers => "subscribers",
            Self::Contributors => "contributors",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}
