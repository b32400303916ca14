//! Retry with exponential back-off and jitter for the places client.
//!
//! [`retry_with_backoff`] wraps one request and retries it on transient
//! errors (network failures, 429, 5xx). Everything else is returned
//! immediately. Once retries are exhausted the caller sees the last error,
//! and the photo cache records the outcome for the rest of the session.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - [`PlacesError::RateLimited`]: the service asked us to slow down.
/// - [`PlacesError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:** 404s, other 4xx statuses, malformed bodies, and
/// configuration errors.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::RateLimited { .. } => true,
        PlacesError::UnexpectedStatus { status, .. } => *status >= 500,
        PlacesError::NotFound { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl(_)
        | PlacesError::MissingApiKey => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt   |
/// |---------|-----------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter  |
/// | 2       | 500 ms × 2¹ ± 25 % jitter  |
///
/// A `Retry-After` hint on a 429 raises the delay to at least that long,
/// jitter included.
/// Delay is capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "places transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32, err: &PlacesError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let floor = match err {
        PlacesError::RateLimited {
            retry_after_secs: Some(secs),
        } => secs.saturating_mul(1_000),
        _ => 0,
    };
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    // The server's hint is a lower bound; jitter never undercuts it.
    jittered.max(floor).min(MAX_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> PlacesError {
        PlacesError::UnexpectedStatus {
            status: 503,
            url: "https://places.test/v1/places/abc".to_owned(),
        }
    }

    #[test]
    fn not_found_is_not_retriable() {
        assert!(!is_retriable(&PlacesError::NotFound {
            url: "https://places.test".to_owned()
        }));
    }

    #[test]
    fn client_error_status_is_not_retriable() {
        assert!(!is_retriable(&PlacesError::UnexpectedStatus {
            status: 403,
            url: "https://places.test".to_owned()
        }));
    }

    #[test]
    fn server_error_and_rate_limit_are_retriable() {
        assert!(is_retriable(&server_error()));
        assert!(is_retriable(&PlacesError::RateLimited {
            retry_after_secs: None
        }));
    }

    #[test]
    fn retry_after_hint_raises_delay() {
        let err = PlacesError::RateLimited {
            retry_after_secs: Some(4),
        };
        let delay = backoff_delay_ms(10, 1, &err);
        assert_eq!(delay, 4_000);
    }

    #[test]
    fn jitter_never_undercuts_retry_after() {
        let err = PlacesError::RateLimited {
            retry_after_secs: Some(10),
        };
        for _ in 0..200 {
            let delay = backoff_delay_ms(10_000, 1, &err);
            assert!((10_000..=12_500).contains(&delay), "delay was {delay}");
        }
    }

    #[test]
    fn retry_after_floor_is_still_capped() {
        let err = PlacesError::RateLimited {
            retry_after_secs: Some(3_600),
        };
        assert_eq!(backoff_delay_ms(10, 1, &err), MAX_DELAY_MS);
    }

    #[test]
    fn delay_is_capped() {
        let delay = backoff_delay_ms(u64::MAX / 2, 10, &server_error());
        assert!(delay <= MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, PlacesError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(server_error())
                } else {
                    Ok::<u32, PlacesError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(server_error())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(PlacesError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(PlacesError::NotFound {
                    url: "https://places.test/v1/places/missing".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "NotFound must not be retried");
        assert!(matches!(result, Err(PlacesError::NotFound { .. })));
    }
}
