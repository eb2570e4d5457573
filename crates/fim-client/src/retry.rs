// Fixed-delay retry for the initial metadata loads.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How often and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, or `None` to retry until success.
    pub attempts: Option<u32>,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: None,
            delay: Duration::from_millis(3000),
        }
    }
}

/// Run `op` until it succeeds, sleeping `policy.delay` between failures.
///
/// With a bounded policy the last error is returned once the attempts are
/// used up. `Some(0)` is treated as a single attempt.
pub async fn retry_fixed<T, E, F, Fut>(mut op: F, policy: RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if let Some(max) = policy.attempts {
                    if attempt >= max.max(1) {
                        return Err(e);
                    }
                }
                warn!(attempt, "attempt failed, retrying in {:?}: {e}", policy.delay);
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let policy = RetryPolicy {
            attempts: None,
            delay: Duration::from_millis(3000),
        };

        let result: Result<u32, String> = retry_fixed(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(format!("failure {n}"))
                } else {
                    Ok(n)
                }
            },
            policy,
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_policy_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: Some(2),
            delay: Duration::from_millis(10),
        };

        let result: Result<(), String> = retry_fixed(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(format!("failure {n}"))
            },
            policy,
        )
        .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_means_one() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            attempts: Some(0),
            delay: Duration::from_millis(10),
        };
        let result: Result<(), &str> = retry_fixed(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
            policy,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_retries_forever_every_three_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, None);
        assert_eq!(policy.delay, Duration::from_secs(3));
    }
}
