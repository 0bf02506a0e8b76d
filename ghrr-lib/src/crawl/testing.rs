//! In-memory doubles for exercising the crawl engine without a network.

use super::crawl_target::CrawlTarget;
use super::progress::Progress;
use crate::github::{ApiResult, Collection, OrgRef, Page, Rejection, RepoSummary, UserProfile, UserRef, UserSource};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Progress sink that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<(String, Option<u64>)>>,
    advanced: Mutex<u64>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn phases(&self) -> Vec<(String, Option<u64>)> {
        self.phases.lock().unwrap().clone()
    }

    pub fn advanced(&self) -> u64 {
        *self.advanced.lock().unwrap()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Progress for RecordingProgress {
    fn set_phase(&self, phase: &str, expected: Option<u64>) {
        self.phases.lock().unwrap().push((phase.to_string(), expected));
    }

    fn advance(&self) {
        *self.advanced.lock().unwrap() += 1;
    }

    fn warn(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }

    fn done(&self) {}
}

/// A one-shot failure injected before a call is allowed to succeed
#[derive(Debug, Clone)]
pub enum Fault {
    /// Quota exhausted, resetting at the given time
    RateLimited(Option<DateTime<Utc>>),

    /// A refusal that is not about quota
    Refused(&'static str),

    /// A transient failure such as a dropped connection
    Failed(&'static str),
}

impl Fault {
    fn into_result<T>(self) -> ApiResult<T> {
        match self {
            Self::RateLimited(reset_at) => {
                ApiResult::Rejected(Rejection::new(403, "API rate limit exceeded for user ID 1.", reset_at))
            }
            Self::Refused(message) => ApiResult::Rejected(Rejection::new(403, message, None)),
            Self::Failed(message) => ApiResult::Failed(ohno::app_err!("{message}")),
        }
    }
}

/// Scripted in-memory [`UserSource`].
///
/// Listings are served in pages of `page_size`. Faults are keyed by call:
/// `repo`, `refs:{collection}:{page}`, `user:{login}`, `orgs:{login}:{page}`.
#[derive(Debug)]
pub struct FakeSource {
    summary: RepoSummary,
    page_size: usize,
    collections: HashMap<Collection, Vec<String>>,
    profiles: HashMap<String, UserProfile>,
    orgs: HashMap<String, Vec<String>>,
    faults: Mutex<HashMap<String, VecDeque<Fault>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            summary: RepoSummary::default(),
            page_size: 2,
            collections: HashMap::new(),
            profiles: HashMap::new(),
            orgs: HashMap::new(),
            faults: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_counts(mut self, stargazers: Option<i64>, subscribers: Option<i64>) -> Self {
        self.summary = RepoSummary {
            stargazers_count: stargazers,
            subscribers_count: subscribers,
        };
        self
    }

    /// List `logins` in `collection`, creating a profile for each one not yet known
    pub fn with_collection(mut self, collection: Collection, logins: &[&str]) -> Self {
        for login in logins {
            let _ = self.profiles.entry((*login).to_string()).or_insert_with(|| profile(login));
        }
        let _ = self
            .collections
            .insert(collection, logins.iter().map(|login| (*login).to_string()).collect());
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        let _ = self.profiles.insert(profile.login.clone(), profile);
        self
    }

    /// Serve `profile` for lookups of `login`, whatever login the profile itself reports
    pub fn with_profile_as(mut self, login: &str, profile: UserProfile) -> Self {
        let _ = self.profiles.insert(login.to_string(), profile);
        self
    }

    pub fn with_orgs(mut self, login: &str, orgs: &[&str]) -> Self {
        let _ = self
            .orgs
            .insert(login.to_string(), orgs.iter().map(|org| (*org).to_string()).collect());
        self
    }

    /// Make the next call matching `key` fail with `fault` before succeeding
    pub fn with_fault(self, key: &str, fault: Fault) -> Self {
        self.faults
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(fault);
        self
    }

    /// Every call made so far, by key
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of profile lookups made so far
    pub fn profile_calls(&self) -> usize {
        self.calls().iter().filter(|call| call.starts_with("user:")).count()
    }

    fn record_call(&self, key: &str) -> Option<Fault> {
        self.calls.lock().unwrap().push(key.to_string());
        self.faults.lock().unwrap().get_mut(key).and_then(VecDeque::pop_front)
    }

    fn page_of(&self, items: &[String], page: u32) -> Page<String> {
        let start = (page as usize - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        if start >= items.len() {
            return Page::empty();
        }

        Page {
            items: items[start..end].to_vec(),
            has_next: end < items.len(),
        }
    }
}

impl UserSource for FakeSource {
    async fn repository(&self, _target: &CrawlTarget) -> ApiResult<RepoSummary> {
        if let Some(fault) = self.record_call("repo") {
            return fault.into_result();
        }
        ApiResult::Success(self.summary.clone())
    }

    async fn user_refs(&self, _target: &CrawlTarget, collection: Collection, page: u32) -> ApiResult<Page<UserRef>> {
        if let Some(fault) = self.record_call(&format!("refs:{collection}:{page}")) {
            return fault.into_result();
        }
        let items = self.collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        let page = self.page_of(items, page);
        ApiResult::Success(Page {
            items: page.items.into_iter().map(UserRef::new).collect(),
            has_next: page.has_next,
        })
    }

    async fn user(&self, login: &str) -> ApiResult<UserProfile> {
        if let Some(fault) = self.record_call(&format!("user:{login}")) {
            return fault.into_result();
        }
        match self.profiles.get(login) {
            Some(profile) => ApiResult::Success(profile.clone()),
            None => ApiResult::Failed(ohno::app_err!("no such user '{login}'")),
        }
    }

    async fn user_orgs(&self, login: &str, page: u32) -> ApiResult<Page<OrgRef>> {
        if let Some(fault) = self.record_call(&format!("orgs:{login}:{page}")) {
            return fault.into_result();
        }
        let items = self.orgs.get(login).map(Vec::as_slice).unwrap_or_default();
        let page = self.page_of(items, page);
        ApiResult::Success(Page {
            items: page.items.into_iter().map(|login| OrgRef { login }).collect(),
            has_next: page.has_next,
        })
    }
}

/// A plain profile for `login`
pub fn profile(login: &str) -> UserProfile {
    UserProfile {
        login: login.to_string(),
        company: None,
        email: None,
        location: None,
        followers: 1,
        public_repos: 1,
    }
}
