//! Command-line interface and orchestration for ghrr
//!
//! This module implements the CLI commands and wires the GitHub client, the
//! configuration, and the progress display into the crawl engine.
//!
//! # Commands
//!
//! - **retrieve**: Crawl a repository named as `OWNER/NAME`, by URL, or with `-o`/`-r`
//!   into a new dated CSV file, a chosen path, or standard output
//! - **resume**: Continue a crawl into an existing CSV file. Users already present in
//!   the file are skipped without any profile lookups. The repository is inferred from
//!   the file name unless given explicitly.
//! - **init**: Generate a default configuration file
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The `common` module loads the configuration, checks
//! credentials, sets up logging, and drives a single crawl.

mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod resume;
mod retrieve;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use common::{ColorMode, CommonArgs, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use resume::{ResumeArgs, process_resume};
pub use retrieve::{RetrieveArgs, process_retrieve};
pub use run::run;
