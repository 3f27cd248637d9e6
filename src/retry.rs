//! Retry policy for transient API failures.
//!
//! [`RetryPolicy`] wraps an arbitrary async operation and re-runs it on
//! transient failures with linear backoff: the wait after attempt `n`
//! (1-indexed) is `retry_delay * n`. What counts as transient is decided by a
//! swappable [`RetryPredicate`], so the policy can be unit tested without any
//! network access.
//!
//! A retryable *response* (5xx) that survives every attempt is returned
//! as-is so the caller can assert on its status; a transport error on the
//! final attempt propagates as an error.

use http::StatusCode;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::settings::ApiSettings;
use crate::{Error, Result};

/// Implemented by response types the policy can classify by status code.
pub trait HasStatus {
    /// The HTTP status code of this response.
    fn status_code(&self) -> StatusCode;
}

/// A borrowed view of one attempt's outcome, as seen by a predicate.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// The transport produced a well-formed response with this status.
    Response(StatusCode),
    /// The attempt failed before a response existed.
    Error(&'a Error),
}

/// Decides whether a single attempt's outcome warrants another try.
///
/// # Examples
///
/// ```
/// use bookstore_conformance::retry::{Outcome, RetryPredicate};
///
/// /// Retries only on 503, letting other 5xx statuses through.
/// struct RetryOn503;
///
/// impl RetryPredicate for RetryOn503 {
///     fn should_retry(&self, outcome: Outcome<'_>) -> bool {
///         matches!(outcome, Outcome::Response(status) if status.as_u16() == 503)
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the outcome is transient and the call should be
    /// attempted again.
    fn should_retry(&self, outcome: Outcome<'_>) -> bool;
}

/// The default classification: transport-level errors and 5xx statuses are
/// transient; every well-formed response below 500 is terminal.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransient;

impl RetryPredicate for RetryOnTransient {
    fn should_retry(&self, outcome: Outcome<'_>) -> bool {
        match outcome {
            Outcome::Response(status) => status.is_server_error(),
            Outcome::Error(error) => error.is_retryable(),
        }
    }
}

/// Bounded retry with linear backoff.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retry_attempts: u32,
    retry_delay: Duration,
    predicate: Arc<dyn RetryPredicate>,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retry_attempts` retries on top of the
    /// initial attempt, waiting `retry_delay * n` before retry `n`.
    pub fn new(max_retry_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_retry_attempts,
            retry_delay,
            predicate: Arc::new(RetryOnTransient),
        }
    }

    /// Builds the policy from the ambient [`ApiSettings`].
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(settings.max_retry_attempts, settings.retry_delay())
    }

    /// Swaps in a custom transient/terminal classification.
    pub fn with_predicate(mut self, predicate: Arc<dyn RetryPredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Returns the backoff before the retry following attempt `attempt`
    /// (1-indexed), or `None` once retries are exhausted.
    ///
    /// ```
    /// use bookstore_conformance::retry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_millis(1000));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(1000)));
    /// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(2000)));
    /// assert_eq!(policy.delay_for_attempt(3), Some(Duration::from_millis(3000)));
    /// assert_eq!(policy.delay_for_attempt(4), None);
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt > self.max_retry_attempts {
            None
        } else {
            Some(self.retry_delay * attempt)
        }
    }

    /// Runs `operation` until its outcome is terminal or retries run out.
    ///
    /// Returns the final outcome together with the number of attempts made.
    /// Attempts run sequentially; concurrent `execute` calls share no state
    /// beyond the (read-only) policy itself.
    pub async fn execute<R, F, Fut>(&self, mut operation: F) -> Result<(R, u32)>
    where
        R: HasStatus,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut attempt: u32 = 1;
        loop {
            let outcome = operation().await;

            let view = match &outcome {
                Ok(response) => Outcome::Response(response.status_code()),
                Err(error) => Outcome::Error(error),
            };
            if !self.predicate.should_retry(view) {
                return outcome.map(|response| (response, attempt));
            }

            let Some(delay) = self.delay_for_attempt(attempt) else {
                // Retries exhausted: hand back the last transient outcome.
                return outcome.map(|response| (response, attempt));
            };

            let status = match view {
                Outcome::Response(status) => Some(status.as_u16()),
                Outcome::Error(_) => None,
            };
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                status = ?status,
                "transient failure, retrying after backoff"
            );

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retry_attempts", &self.max_retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Probe(StatusCode);

    impl HasStatus for Probe {
        fn status_code(&self) -> StatusCode {
            self.0
        }
    }

    fn fast_policy(max_retry_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_retry_attempts, Duration::from_millis(1))
    }

    #[test]
    fn backoff_grows_linearly_with_the_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));

        assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(1000)));
        assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(2000)));
        assert_eq!(policy.delay_for_attempt(3), Some(Duration::from_millis(3000)));
        assert_eq!(policy.delay_for_attempt(4), None);
    }

    #[test]
    fn zero_retries_means_a_single_attempt() {
        let policy = fast_policy(0);
        assert_eq!(policy.delay_for_attempt(1), None);
    }

    #[tokio::test]
    async fn terminal_status_returns_after_one_attempt() {
        let calls = AtomicU32::new(0);

        let (response, attempts) = fast_policy(3)
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Probe(StatusCode::NOT_FOUND)) }
            })
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persistent_5xx_uses_every_attempt_and_returns_the_last_response() {
        let calls = AtomicU32::new(0);

        let (response, attempts) = fast_policy(3)
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Probe(StatusCode::SERVICE_UNAVAILABLE)) }
            })
            .await
            .unwrap();

        // Initial attempt plus three retries, and the 503 comes back as a
        // response rather than an error.
        assert_eq!(attempts, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn recovers_when_a_later_attempt_succeeds() {
        let calls = AtomicU32::new(0);

        let (response, attempts) = fast_policy(3)
            .execute(|| {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < 2 {
                        Err(Error::Timeout)
                    } else {
                        Ok(Probe(StatusCode::OK))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn transport_error_on_the_final_attempt_propagates() {
        let calls = AtomicU32::new(0);

        let result = fast_policy(2)
            .execute::<Probe, _, _>(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::Timeout) }
            })
            .await;

        assert!(matches!(result, Err(Error::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn custom_predicate_can_refuse_all_retries() {
        struct NeverRetry;
        impl RetryPredicate for NeverRetry {
            fn should_retry(&self, _outcome: Outcome<'_>) -> bool {
                false
            }
        }

        let calls = AtomicU32::new(0);
        let (response, attempts) = fast_policy(5)
            .with_predicate(Arc::new(NeverRetry))
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Probe(StatusCode::INTERNAL_SERVER_ERROR)) }
            })
            .await
            .unwrap();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
