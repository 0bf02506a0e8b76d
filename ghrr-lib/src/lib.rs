#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for ghrr
//!
//! This library consolidates all functionality for the ghrr tool, which collects the
//! users who starred, watched, or contributed to a GitHub repository, enriches each one
//! with profile data, and writes the result to a CSV file.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`github`]: GitHub API client and the paginated user source abstraction
//! - [`crawl`]: The resumable crawl engine

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod crawl;
#[cfg(not(any(debug_assertions, test)))]
mod crawl;

#[cfg(any(debug_assertions, test))]
pub mod github;
#[cfg(not(any(debug_assertions, test)))]
mod github;

pub use crate::commands::{Host, run};
