//! Bounded retry with linearly increasing back-off.

use std::future::Future;
use std::time::Duration;

use crate::TransportError;

/// How often, and how patiently, a request is retried.
///
/// The delay before retrying after failed attempt `n` (zero-based) is
/// `base_delay * (n + 1)`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use citywalk_data::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.delay_after(0), Duration::from_secs(1));
/// assert_eq!(policy.delay_after(1), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Unit of back-off between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy with explicit limits.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Retry without waiting between attempts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Back-off after the zero-based failed `attempt`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }

    /// Run `call` until it succeeds or the attempts are exhausted.
    ///
    /// Every failure is logged at `warn`. The last error is returned.
    pub(crate) async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::warn!(
                        "{operation} attempt {}/{attempts} failed: {err}",
                        attempt + 1
                    );
                    if attempt + 1 >= attempts {
                        return Err(err);
                    }
                    let delay = self.delay_after(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
