//! The resumable crawl engine
//!
//! A crawl walks three repository collections (stargazers, subscribers, contributors)
//! through a [`UserSource`](crate::github::UserSource), resolves every user not yet
//! recorded into a full profile, and streams one CSV row per user into an output sink.
//!
//! # Implementation Model
//!
//! Execution is strictly sequential: one remote call at a time, one walk after another.
//! Every remote operation runs under a [`Retrier`], which hands quota rejections to the
//! [`Governor`] (sleep until the quota resets) and backs off for a fixed interval on any
//! other failure before repeating the very same operation. The default [`RetryPolicy`]
//! never gives up.
//!
//! Progress is durable: each row is flushed as soon as it is written. Restarting a crawl
//! against the same output file seeds the set of recorded users from the rows already present, so
//! those users are skipped without any profile lookup.

mod crawl_target;
mod crawler;
mod destination;
mod governor;
mod progress;
mod resolver;
mod retry_policy;
mod seen_users;
mod sink;
mod user_record;
mod walker;

#[cfg(test)]
pub mod testing;

pub use crawl_target::CrawlTarget;
pub use crawler::{CrawlSummary, retrieve};
pub use destination::Destination;
pub use governor::{Governor, MIN_MARGIN};
pub use progress::Progress;
pub use retry_policy::{Retrier, RetryPolicy};
