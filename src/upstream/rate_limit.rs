// Rate limiting for upstream API calls with exponential backoff.
//
// The sliding-window limiter throttles requests so the client stays under
// the upstream budget; `with_retry` retries 429 responses with exponential
// backoff and jitter. This is the collaborator-side retry policy: the
// analysis core never retries.
//
// Shared across concurrent tasks via Arc<RateLimiter>; interior mutability
// means callers only need &self.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use super::error::FetchError;

/// A sliding-window rate limiter.
pub struct RateLimiter {
    /// Timestamps of recent requests within the current window.
    requests: Mutex<VecDeque<Instant>>,
    max_requests: u32,
    window: Duration,
    /// Minimum delay between consecutive requests to avoid bursts.
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

// A poisoned lock only means another task panicked mid-update; the queue of
// timestamps is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RateLimiter {
    /// - `max_requests_per_window`: how many requests are allowed in the window
    /// - `window`: the sliding window duration
    /// - `min_delay`: minimum gap between consecutive requests
    pub fn new(max_requests_per_window: u32, window: Duration, min_delay: Duration) -> Self {
        Self {
            requests: Mutex::new(VecDeque::new()),
            max_requests: max_requests_per_window,
            window,
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    /// Wait if necessary before making a request.
    ///
    /// Enforces the minimum delay, then sleeps until the window has room.
    pub async fn acquire(&self) {
        // Never hold a guard across an await.
        let min_delay_wait = {
            let last = lock(&self.last_request);
            (*last)
                .and_then(|t| self.min_delay.checked_sub(t.elapsed()))
                .filter(|d| !d.is_zero())
        };
        if let Some(wait) = min_delay_wait {
            tokio::time::sleep(wait).await;
        }

        loop {
            let wait = {
                let now = Instant::now();
                let mut requests = lock(&self.requests);

                while let Some(&oldest) = requests.front() {
                    if now.duration_since(oldest) >= self.window {
                        requests.pop_front();
                    } else {
                        break;
                    }
                }

                if (requests.len() as u32) < self.max_requests {
                    requests.push_back(now);
                    *lock(&self.last_request) = Some(now);
                    None
                } else {
                    requests
                        .front()
                        .map(|oldest| (*oldest + self.window).duration_since(now))
                }
            };

            match wait {
                None => return,
                Some(wait) => {
                    info!(
                        delay_ms = wait.as_millis() as u64,
                        "Rate limit: waiting {}ms before next request",
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    #[cfg(test)]
    fn in_window(&self) -> usize {
        lock(&self.requests).len()
    }
}

/// Maximum number of retry attempts on rate-limit (429) errors.
const MAX_RETRIES: u32 = 5;

/// Base delay for exponential backoff (doubles each retry).
const BASE_BACKOFF: Duration = Duration::from_secs(2);

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Retry an async operation with exponential backoff on `FetchError::RateLimited`.
///
/// Other errors are returned immediately. `acquire()` runs before every
/// attempt, retries included.
pub async fn with_retry<F, Fut, T>(rate_limiter: &RateLimiter, operation: F) -> Result<T, FetchError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        rate_limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_rate_limit() || attempt >= MAX_RETRIES {
                    return Err(err);
                }

                attempt += 1;
                let backoff = BASE_BACKOFF
                    .saturating_mul(1u32 << attempt)
                    .min(MAX_BACKOFF);

                // +/- 25% jitter from the clock's sub-second nanos.
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos();
                let jitter_factor = 0.75 + (nanos % 500) as f64 / 1000.0;
                let jittered = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);

                warn!(
                    attempt = attempt,
                    max_retries = MAX_RETRIES,
                    backoff_secs = jittered.as_secs_f64(),
                    "Rate limited (429), retrying in {:.1}s (attempt {}/{})",
                    jittered.as_secs_f64(),
                    attempt,
                    MAX_RETRIES,
                );

                tokio::time::sleep(jittered).await;
            }
        }
    }
}
