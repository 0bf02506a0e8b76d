use super::governor::Governor;
use super::progress::{Progress, report_warning};
use crate::Result;
use crate::github::ApiResult;
use core::fmt::{Debug, Display, Formatter};
use core::num::NonZeroU32;
use core::time::Duration;
use ohno::bail;

const LOG_TARGET: &str = "     retry";

/// How failed remote operations are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Give up after this many attempts; `None` retries forever
    pub max_attempts: Option<NonZeroU32>,

    /// Pause after a failure that is not a quota rejection
    pub error_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            error_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max.get())
    }
}

/// Drives a remote operation until it succeeds, applying the retry policy and the governor.
#[derive(Clone, Copy)]
pub struct Retrier<'a> {
    policy: RetryPolicy,
    governor: Governor,
    progress: &'a dyn Progress,
}

impl<'a> Retrier<'a> {
    #[must_use]
    pub fn new(policy: RetryPolicy, governor: Governor, progress: &'a dyn Progress) -> Self {
        Self {
            policy,
            governor,
            progress,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &'a dyn Progress {
        self.progress
    }

    /// Call `attempt` until it yields a value.
    ///
    /// Quota rejections wait for the quota to reset, other failures back off for the
    /// configured interval. Each retry repeats exactly the same operation.
    ///
    /// # Errors
    ///
    /// Fails when a rejection is not a quota problem, or when the policy's attempt cap is reached.
    pub async fn run<T, F, Fut>(&self, operation: impl Display, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match attempt().await {
                ApiResult::Success(value) => return Ok(value),
                ApiResult::Rejected(rejection) => {
                    log::debug!(target: LOG_TARGET, "Request for {operation} rejected: {rejection}");
                    if self.policy.exhausted(attempts) {
                        bail!("giving up on {operation} after {attempts} attempt(s): {rejection}");
                    }
                    self.governor.wait_for_reset(&rejection, self.progress).await?;
                }
                ApiResult::Failed(e) => {
                    report_warning(self.progress, LOG_TARGET, &format!("Could not fetch {operation}: {e}"));
                    if self.policy.exhausted(attempts) {
                        bail!("giving up on {operation} after {attempts} attempt(s): {e}");
                    }
                    tokio::time::sleep(self.policy.error_backoff).await;
                }
            }
        }
    }
}

impl Debug for Retrier<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .field("governor", &self.governor)
            .field("progress", &"<progress>")
            .finish()
    }
}
