use crate::Result;
use crate::crawl::{Governor, MIN_MARGIN, RetryPolicy};
use crate::github::DEFAULT_API_URL;
use camino::{Utf8Path, Utf8PathBuf};
use core::num::NonZeroU32;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Configuration file looked up in the current directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "ghrr.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory receiving output files named after the target and date
    #[serde(default = "default_output_dir")]
    pub output_dir: Utf8PathBuf,

    /// Entries requested per page (1..=100)
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Pause before retrying after a failure that is not a rate-limit rejection
    #[serde(default = "default_error_backoff", with = "humantime_serde")]
    pub error_backoff: Duration,

    /// Safety margin added to every rate-limit wait
    #[serde(default = "default_rate_limit_margin", with = "humantime_serde")]
    pub rate_limit_margin: Duration,

    /// Wait used when a rate-limit rejection carries no reset time
    #[serde(default = "default_rate_limit_fallback_wait", with = "humantime_serde")]
    pub rate_limit_fallback_wait: Duration,

    /// Attempts per operation before giving up; unbounded when absent
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("outputs")
}

const fn default_page_size() -> u8 {
    100
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_error_backoff() -> Duration {
    Duration::from_secs(10)
}

const fn default_rate_limit_margin() -> Duration {
    MIN_MARGIN
}

const fn default_rate_limit_fallback_wait() -> Duration {
    Duration::from_secs(60)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading ghrr configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading ghrr configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range
    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and 100, got {}", self.page_size));
        }

        if self.rate_limit_margin < MIN_MARGIN {
            return Err(app_err!(
                "rate_limit_margin must be at least {}s, got {}s",
                MIN_MARGIN.as_secs(),
                self.rate_limit_margin.as_secs_f64()
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.max_attempts == Some(0) {
            return Err(app_err!("max_attempts must be at least 1 when present"));
        }

        if self.api_url.trim().is_empty() {
            return Err(app_err!("api_url must not be empty"));
        }

        Ok(())
    }

    /// The retry policy described by this configuration
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.and_then(NonZeroU32::new),
            error_backoff: self.error_backoff,
        }
    }

    /// The rate-limit governor described by this configuration
    #[must_use]
    pub fn governor(&self) -> Governor {
        Governor::new(self.rate_limit_margin, self.rate_limit_fallback_wait)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text).into_app_err("parsing test configuration")?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.output_dir, "outputs");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.error_backoff, Duration::from_secs(10));
        assert_eq!(config.rate_limit_margin, Duration::from_secs(3));
        assert_eq!(config.rate_limit_fallback_wait, Duration::from_secs(60));
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            page_size = 50
            error_backoff = "2m"
            max_attempts = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size, 50);
        let policy = config.retry_policy();
        assert_eq!(policy.error_backoff, Duration::from_secs(120));
        assert_eq!(policy.max_attempts, NonZeroU32::new(4));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let _ = parse("retries = 3").unwrap_err();
    }

    #[test]
    fn test_page_size_out_of_range() {
        let _ = parse("page_size = 0").unwrap_err();
        let _ = parse("page_size = 101").unwrap_err();
    }

    #[test]
    fn test_margin_below_floor_rejected() {
        let _ = parse(r#"rate_limit_margin = "1s""#).unwrap_err();
        let config = parse(r#"rate_limit_margin = "5s""#).unwrap();
        assert_eq!(config.governor().margin(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_max_attempts_rejected() {
        let _ = parse("max_attempts = 0").unwrap_err();
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri does not support file operations")]
    fn test_load_missing_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let config = Config::load(&base, None).unwrap();
        assert_eq!(config.page_size, 100);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri does not support file operations")]
    fn test_load_default_file_from_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(base.join(DEFAULT_CONFIG_FILE), "output_dir = \"data\"\n").unwrap();

        let config = Config::load(&base, None).unwrap();
        assert_eq!(config.output_dir, "data");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri does not support file operations")]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let missing = base.join("nope.toml");

        let _ = Config::load(&base, Some(&missing)).unwrap_err();
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri does not support file operations")]
    fn test_save_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("ghrr.toml")).unwrap();

        Config::save_default(&path).unwrap();
        let config = Config::load(Utf8Path::new("."), Some(&path)).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
