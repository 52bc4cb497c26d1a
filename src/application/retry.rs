//! # Retry Executor
//!
//! Bounded retry with a fixed inter-attempt delay, for any async operation.
//! Knows nothing about commands or the transport; the router hands it a
//! closure and a policy and gets back the operation's result or its last
//! failure.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration of attempt count and inter-attempt delay.
///
/// One shared instance covers the whole process; there are no per-command
/// overrides. The delay is fixed: no exponential backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy. `max_attempts` below 1 is clamped to 1, so the
    /// operation always runs at least once.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Wraps async operations with retry semantics from a [`RetryPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `operation`, re-attempting on failure.
    ///
    /// Success returns immediately. Each failure is logged at ERROR with its
    /// attempt index, including the final one; between attempts the caller is
    /// suspended for the policy's delay. Once all attempts are exhausted the
    /// last error propagates unchanged.
    ///
    /// `label` identifies the operation in log lines (e.g. the command name).
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::error!("'{}' attempt {} failed: {:#}", label, attempt, e);
                    if attempt >= self.policy.max_attempts {
                        return Err(e);
                    }
                    sleep(self.policy.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn counter() -> Arc<AtomicU32> {
        Arc::new(AtomicU32::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt_runs_once_without_delay() {
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));
        let calls = counter();
        let start = Instant::now();

        let calls_ref = calls.clone();
        let result = executor
            .execute("op", move || {
                let calls = calls_ref.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));
        let calls = counter();
        let start = Instant::now();

        let calls_ref = calls.clone();
        let result = executor
            .execute("op", move || {
                let calls = calls_ref.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(anyhow!("transient"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two inter-attempt delays of 2s each.
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_runs_exactly_max_attempts() {
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));
        let calls = counter();

        let calls_ref = calls.clone();
        let result: Result<()> = executor
            .execute("op", move || {
                let calls = calls_ref.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow!("broken"))
                }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "broken");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_means_no_retry() {
        let executor = RetryExecutor::new(RetryPolicy::new(1, Duration::from_secs(2)));
        let calls = counter();
        let start = Instant::now();

        let calls_ref = calls.clone();
        let result: Result<()> = executor
            .execute("op", move || {
                let calls = calls_ref.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow!("broken"))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    /// Counts ERROR events seen while installed as the default subscriber.
    struct ErrorCounter {
        errors: Arc<AtomicU32>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.errors.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn error_counting_subscriber()
    -> (impl tracing::Subscriber + Send + Sync + 'static, Arc<AtomicU32>) {
        use tracing_subscriber::layer::SubscriberExt;

        let errors = counter();
        let subscriber = tracing_subscriber::registry().with(ErrorCounter {
            errors: errors.clone(),
        });
        (subscriber, errors)
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_failed_attempt_is_logged_at_error() {
        use tracing::instrument::WithSubscriber;

        let (subscriber, errors) = error_counting_subscriber();
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));

        let result: Result<()> = executor
            .execute("op", || async { Err(anyhow!("broken")) })
            .with_subscriber(subscriber)
            .await;

        assert!(result.is_err());
        // One ERROR line per failed attempt, including the final one.
        assert_eq!(errors.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failures_log_one_error_each() {
        use tracing::instrument::WithSubscriber;

        let (subscriber, errors) = error_counting_subscriber();
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));
        let calls = counter();

        let calls_ref = calls.clone();
        let result = executor
            .execute("op", move || {
                let calls = calls_ref.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 { Err(anyhow!("transient")) } else { Ok(()) }
                }
            })
            .with_subscriber(subscriber)
            .await;

        assert!(result.is_ok());
        assert_eq!(errors.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_logs_no_error() {
        use tracing::instrument::WithSubscriber;

        let (subscriber, errors) = error_counting_subscriber();
        let executor = RetryExecutor::new(RetryPolicy::new(3, Duration::from_secs(2)));

        let result = executor
            .execute("op", || async { Ok(()) })
            .with_subscriber(subscriber)
            .await;

        assert!(result.is_ok());
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_policy_clamps_zero_attempts() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }
}
