//! Retrying provider calls with key rotation and a fallback value.

use std::future::Future;

use tracing::trace;

use super::config::RetryPolicy;
use super::error::RoutingError;
use super::keys::KeyPool;

/// Result of a retried call. Never an error: exhausted or unrecoverable
/// calls resolve to the fallback value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The call succeeded.
    Success { value: T, attempts: usize },

    /// The fallback value was substituted.
    Fallback {
        value: T,
        attempts: usize,
        error: RoutingError,
    },
}

/// Run `op` with keys from `pool` until it succeeds, fails unrecoverably,
/// or runs out of attempts.
///
/// Each attempt gets the next key of a fresh rotation, so with
/// `attempts <= pool.len()` every attempt uses a different key. Retryable
/// errors (see [`RoutingError::is_retryable`]) move on to the next key after
/// the policy's backoff; any other error, or exhaustion, yields `fallback`.
pub async fn call_with_fallback<'k, T, F, Fut>(
    policy: &RetryPolicy,
    pool: &'k KeyPool,
    fallback: T,
    mut op: F,
) -> Outcome<T>
where
    F: FnMut(&'k str) -> Fut,
    Fut: Future<Output = Result<T, RoutingError>>,
{
    let max_attempts = policy.attempts_for(pool.len());
    let mut keys = pool.rotation();
    let mut last_error = RoutingError::NoRoute;

    for attempt in 1..=max_attempts {
        let Some(key) = keys.next() else {
            break;
        };

        let result = match policy.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, op(key)).await {
                Ok(result) => result,
                Err(_) => Err(RoutingError::Timeout(limit)),
            },
            None => op(key).await,
        };

        match result {
            Ok(value) => {
                return Outcome::Success {
                    value,
                    attempts: attempt,
                };
            }
            Err(error) if error.is_retryable() => {
                trace!(attempt, max_attempts, error = %error, "retryable routing failure");
                last_error = error;
                if attempt < max_attempts && !policy.backoff.is_zero() {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
            Err(error) => {
                return Outcome::Fallback {
                    value: fallback,
                    attempts: attempt,
                    error,
                };
            }
        }
    }

    Outcome::Fallback {
        value: fallback,
        attempts: max_attempts,
        error: last_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    impl<T> Outcome<T> {
        fn value(&self) -> &T {
            match self {
                Outcome::Success { value, .. } | Outcome::Fallback { value, .. } => value,
            }
        }

        fn attempts(&self) -> usize {
            match self {
                Outcome::Success { attempts, .. } | Outcome::Fallback { attempts, .. } => *attempts,
            }
        }

        fn is_fallback(&self) -> bool {
            matches!(self, Outcome::Fallback { .. })
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: None,
            backoff: Duration::ZERO,
            call_timeout: None,
        }
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let pool = KeyPool::new(["a", "b"]).unwrap();
        let outcome = call_with_fallback(&policy(), &pool, 0, |_key| async { Ok(42) }).await;

        assert_eq!(
            outcome,
            Outcome::Success {
                value: 42,
                attempts: 1
            }
        );
    }

    #[tokio::test]
    async fn persistent_errors_try_every_key_once() {
        let pool = KeyPool::new(["k1", "k2", "k3"]).unwrap();
        let seen = Mutex::new(Vec::new());

        let outcome = call_with_fallback(&policy(), &pool, 999, |key| {
            seen.lock().unwrap().push(key.to_string());
            async { Err::<u32, _>(RoutingError::RateLimited) }
        })
        .await;

        assert!(outcome.is_fallback());
        assert_eq!(*outcome.value(), 999);
        assert_eq!(outcome.attempts(), 3);

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec!["k1", "k2", "k3"]);
    }

    #[tokio::test]
    async fn recovers_on_a_later_key() {
        let pool = KeyPool::new(["bad", "good"]).unwrap();

        let outcome = call_with_fallback(&policy(), &pool, 0, |key| async move {
            if key == "good" {
                Ok(17)
            } else {
                Err(RoutingError::Provider {
                    code: "-8".into(),
                    message: "key blocked".into(),
                })
            }
        })
        .await;

        assert_eq!(*outcome.value(), 17);
        assert!(!outcome.is_fallback());
        assert!(outcome.attempts() <= 2);
    }

    #[tokio::test]
    async fn non_retryable_error_falls_back_immediately() {
        let pool = KeyPool::new(["a", "b", "c"]).unwrap();
        let calls = Mutex::new(0);

        let outcome = call_with_fallback(&policy(), &pool, 120, |_key| {
            *calls.lock().unwrap() += 1;
            async { Err::<u32, _>(RoutingError::Malformed("empty body".into())) }
        })
        .await;

        assert_eq!(
            outcome,
            Outcome::Fallback {
                value: 120,
                attempts: 1,
                error: RoutingError::Malformed("empty body".into()),
            }
        );
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn explicit_attempt_limit_is_respected() {
        let pool = KeyPool::new(["a", "b", "c"]).unwrap();
        let calls = Mutex::new(0);

        let outcome = call_with_fallback(&policy().with_max_attempts(5), &pool, 0, |_key| {
            *calls.lock().unwrap() += 1;
            async { Err::<u32, _>(RoutingError::Transport("reset".into())) }
        })
        .await;

        assert_eq!(outcome.attempts(), 5);
        assert_eq!(*calls.lock().unwrap(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out_and_fall_back() {
        let pool = KeyPool::new(["a", "b"]).unwrap();
        let policy = policy().with_call_timeout(Duration::from_millis(50));

        let outcome = call_with_fallback(&policy, &pool, 7, |_key| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        })
        .await;

        assert_eq!(
            outcome,
            Outcome::Fallback {
                value: 7,
                attempts: 2,
                error: RoutingError::Timeout(Duration::from_millis(50)),
            }
        );
    }
}
