//! Access to the GitHub REST API
//!
//! The crawl engine talks to GitHub only through the [`UserSource`] trait. [`Client`]
//! is the production implementation; tests substitute in-memory sources.
//!
//! Every call yields an [`ApiResult`] that separates refusals (HTTP 403/429, which
//! may signal quota exhaustion) from all other failures, so the retry machinery can
//! route each to the right recovery path.

mod client;
mod credentials;
mod models;
mod source;

pub use client::{Client, DEFAULT_API_URL};
pub use credentials::Credentials;
pub use models::{Collection, OrgRef, Page, RepoSummary, UserProfile, UserRef};
pub use source::{ApiResult, Rejection, UserSource};
pub(crate) use source::unwrap_or_return;
