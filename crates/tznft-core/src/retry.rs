//! Bounded retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;

use tznft_types::RetryConfig;

/// The last error of a retried operation that never succeeded.
#[derive(Debug)]
pub struct RetriesExhausted<E> {
    pub attempts: usize,
    pub last_error: E,
}

/// Call `f` until it succeeds or `retry.max_attempts()` calls have failed.
///
/// `f` receives the 1-based attempt number. The wait between attempts starts
/// at `initial_backoff` and doubles up to `max_backoff`.
pub async fn with_retries<T, E, F, Fut>(retry: RetryConfig, mut f: F) -> Result<T, RetriesExhausted<E>>
where
    E: Display,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0usize;
    let mut backoff = retry.initial_backoff;

    loop {
        attempt += 1;
        match f(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= retry.max_attempts() {
                    return Err(RetriesExhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                tracing::debug!(attempt, error = %e, ?backoff, "attempt failed; retrying");
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, retry.max_backoff);
            }
        }
    }
}
