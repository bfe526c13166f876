//! Per-step retry supervision.
//!
//! Each pipeline step is retried on its own; steps that already completed
//! are never re-run because of a later step's failure. Completed work is
//! persisted, so a retried step finds it and becomes a cache hit.

use std::future::Future;
use std::time::Duration;

use termforge_core::MAX_STEP_ATTEMPTS;

use crate::error::ServiceError;

/// Runs one pipeline step, retrying transient failures with a linear
/// backoff (1s, 2s, ...). Permanent failures return immediately.
pub(crate) async fn retry_step<T, F, Fut>(step: &str, op: F) -> Result<T, ServiceError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt < MAX_STEP_ATTEMPTS => {
                tracing::warn!(step, attempt, %error, "step failed, retrying");
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                attempt += 1;
            },
            Err(error) => {
                tracing::error!(step, attempt, %error, "step failed");
                return Err(error);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn permanent_errors_fail_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_step("fatal", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ServiceError::Fatal("nope".to_owned())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_retry_up_to_the_attempt_cap() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_step("flaky", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ServiceError::Serp(termforge_serp::SerpError::HttpStatus {
                    code: 503,
                    body: String::new(),
                }))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_STEP_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_when_a_retry_succeeds() {
        let calls = AtomicU32::new(0);
        let result = retry_step("flaky", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ServiceError::Serp(termforge_serp::SerpError::HttpStatus {
                        code: 503,
                        body: String::new(),
                    }))
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
