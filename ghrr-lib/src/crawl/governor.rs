use super::progress::{Progress, report_warning};
use crate::Result;
use crate::github::Rejection;
use chrono::{DateTime, Local, Utc};
use core::time::Duration;
use ohno::bail;

const LOG_TARGET: &str = "  governor";

/// Message prefix GitHub uses when the caller's quota is exhausted
pub const RATE_LIMIT_PREFIX: &str = "API rate limit exceeded";

/// Smallest allowed safety margin added to every quota wait
pub const MIN_MARGIN: Duration = Duration::from_secs(3);

/// Decides whether a refused request is a quota problem and, if so, waits for the quota to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governor {
    margin: Duration,
    fallback_wait: Duration,
}

impl Governor {
    /// Create a governor.
    ///
    /// `margin` is raised to [`MIN_MARGIN`] if smaller. `fallback_wait` is used when
    /// a quota rejection does not say when the quota resets.
    #[must_use]
    pub fn new(margin: Duration, fallback_wait: Duration) -> Self {
        Self {
            margin: margin.max(MIN_MARGIN),
            fallback_wait,
        }
    }

    #[must_use]
    pub const fn margin(&self) -> Duration {
        self.margin
    }

    /// Whether the rejection is quota exhaustion, as opposed to any other refusal
    #[must_use]
    pub fn is_quota_exhausted(rejection: &Rejection) -> bool {
        rejection.message.starts_with(RATE_LIMIT_PREFIX)
    }

    /// How long to wait, measured from `now`, before the rejected call may be retried
    #[must_use]
    pub fn wait_duration(&self, rejection: &Rejection, now: DateTime<Utc>) -> Duration {
        let until_reset = rejection
            .reset_at
            .map_or(self.fallback_wait, |reset_at| (reset_at - now).to_std().unwrap_or(Duration::ZERO));

        until_reset + self.margin
    }

    /// Sleep until the quota resets, or propagate the rejection if it is not a quota problem.
    ///
    /// # Errors
    ///
    /// Returns the rejection as an error when its message does not carry the quota prefix.
    pub async fn wait_for_reset(&self, rejection: &Rejection, progress: &dyn Progress) -> Result<()> {
        if !Self::is_quota_exhausted(rejection) {
            bail!("GitHub refused the request: {rejection}");
        }

        let now = Utc::now();
        let wait = self.wait_duration(rejection, now);
        let resume_at = chrono::Duration::from_std(wait)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(now);

        report_warning(
            progress,
            LOG_TARGET,
            &format!(
                "Rate limited. Sleeping until \"{}\" due to rate limit...",
                resume_at.with_timezone(&Local).format("%m/%d/%Y, %H:%M:%S")
            ),
        );

        tokio::time::sleep(wait).await;
        log::debug!(target: LOG_TARGET, "Quota wait of {}s finished", wait.as_secs());

        Ok(())
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::new(MIN_MARGIN, Duration::from_secs(60))
    }
}
