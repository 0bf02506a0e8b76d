//! Common processing logic shared between the retrieve and resume commands.

use super::config::Config;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::crawl::{CrawlSummary, CrawlTarget, Destination, Progress, Retrier, retrieve};
use crate::github::{Client, Credentials};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::Args;
use clap::ValueEnum;
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use std::io::{IsTerminal, Write, stderr};

const LOG_TARGET: &str = "    common";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the retrieve and resume commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub user name the crawl runs as
    #[arg(long, value_name = "USER", env = "GITHUB_USER")]
    pub github_user: Option<String>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `ghrr.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Base URL of the GitHub API, overriding the configuration file
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory for output files named after the repository, overriding the configuration file
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    credentials: Credentials,
    host: &'a mut H,
    color: ColorMode,
    log_level: LogLevel,
}

impl<'a, H: Host> Common<'a, H> {
    /// Set up logging, load the configuration, and check credentials
    ///
    /// Missing credentials are reported on the host's error stream and the host is asked to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or credentials are missing
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let mut config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
        if let Some(api_url) = &args.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(output_dir) = &args.output_dir {
            config.output_dir.clone_from(output_dir);
        }

        let credentials = match Credentials::new(args.github_user.as_deref(), args.github_token.as_deref()) {
            Ok(credentials) => credentials,
            Err(e) => {
                let _ = writeln!(host.error(), "{e}");
                host.exit(1);
                return Err(e);
            }
        };

        Ok(Self {
            config,
            credentials,
            host,
            color: args.color,
            log_level: args.log_level,
        })
    }

    /// Print a warning on the host's error stream, unless warn logging already shows it
    pub fn warn(&mut self, msg: &str) {
        log::warn!(target: LOG_TARGET, "{msg}");
        if !log::log_enabled!(target: LOG_TARGET, log::Level::Warn) {
            let _ = writeln!(self.host.error(), "Warning: {msg}");
        }
    }

    /// Run one crawl of `target` into `destination`
    ///
    /// Prints the output path when writing to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the crawl fails
    pub async fn crawl(&mut self, target: &CrawlTarget, destination: &Destination) -> Result<CrawlSummary> {
        let client = Client::new(
            &self.credentials,
            self.config.api_url.as_str(),
            self.config.page_size,
            self.config.request_timeout,
        )?;

        let progress = self.progress_reporter(destination);
        let retrier = Retrier::new(self.config.retry_policy(), self.config.governor(), &progress);

        log::info!(target: LOG_TARGET, "Crawling '{target}' into '{destination}'");
        let result = retrieve(&client, target, destination, &retrier, self.host.output()).await;
        progress.done();

        let summary = result?;

        if let Destination::File(path) = destination {
            let _ = writeln!(self.host.output(), "{path}");
        }

        Ok(summary)
    }

    /// The destination for a crawl given an optional `--file` argument
    #[must_use]
    pub fn destination(&self, target: &CrawlTarget, file: Option<&str>) -> Destination {
        Destination::resolve(file, &self.config.output_dir, target, Local::now().date_naive())
    }

    fn progress_reporter(&self, destination: &Destination) -> ProgressReporter {
        let use_colors = match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stderr().is_terminal(),
        };

        let interactive = destination.shows_progress() && (self.color != ColorMode::Auto || stderr().is_terminal());
        if !interactive {
            return ProgressReporter::hidden(use_colors);
        }

        let delay = if self.log_level == LogLevel::None {
            Duration::from_millis(300)
        } else {
            Duration::from_hours(365 * 24)
        };

        ProgressReporter::new(delay, use_colors)
    }
}

impl<H: Host> Debug for Common<'_, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Common")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("host", &"<host>")
            .field("color", &self.color)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    fn args(user: Option<&str>, token: Option<&str>) -> CommonArgs {
        CommonArgs {
            github_user: user.map(str::to_string),
            github_token: token.map(str::to_string),
            config: None,
            api_url: Some("http://127.0.0.1:1".to_string()),
            output_dir: Some(Utf8PathBuf::from("out")),
            color: ColorMode::Never,
            log_level: LogLevel::None,
        }
    }

    #[test]
    fn test_missing_token_exits() {
        let mut host = TestHost::new();
        let result = Common::new(&mut host, &args(Some("octocat"), None));

        let Err(e) = result else {
            panic!("missing token should be rejected");
        };
        assert!(e.to_string().contains("GITHUB_TOKEN"));
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_overrides_apply() {
        let mut host = TestHost::new();
        let common = Common::new(&mut host, &args(Some("octocat"), Some("secret"))).unwrap();

        assert_eq!(common.config.api_url, "http://127.0.0.1:1");
        assert!(!format!("{common:?}").contains("secret"));
        let target = CrawlTarget::new("octo", "widgets").unwrap();
        match common.destination(&target, None) {
            Destination::File(path) => assert!(path.starts_with("out")),
            Destination::Stdout => unreachable!("expected a file destination"),
        }
        assert_eq!(common.destination(&target, Some("-")), Destination::Stdout);
    }

    #[test]
    fn test_warn_writes_to_error_stream() {
        let mut host = TestHost::new();
        {
            let mut common = Common::new(&mut host, &args(Some("octocat"), Some("secret"))).unwrap();
            common.warn("file name is odd");
        }
        assert!(host.error_text().contains("Warning: file name is odd"));
    }
}
