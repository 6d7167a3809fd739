// Bounded retry with exponential backoff for transient LLM failures.
//
// Timeouts, connection errors, 429 and 5xx responses are retried up to
// `max_retries` times with doubling delays plus jitter. Anything else (bad key,
// malformed request) is returned immediately.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

/// Non-2xx HTTP response from an API, kept typed so retry can inspect it.
#[derive(Debug)]
pub struct StatusError {
    pub status: u16,
    pub body: String,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API returned {}: {}", self.status, self.body)
    }
}

impl std::error::Error for StatusError {}

impl StatusError {
    pub fn is_transient(&self) -> bool {
        self.status == 429 || (500..600).contains(&self.status)
    }
}

/// How many times and how patiently to retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.max_backoff)
    }
}

/// Whether an error is worth retrying.
pub fn is_transient(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<reqwest::Error>() {
            return e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.as_u16() == 429 || s.is_server_error());
        }
        if let Some(e) = cause.downcast_ref::<StatusError>() {
            return e.is_transient();
        }
        false
    })
}

/// Run `operation`, retrying transient failures according to `policy`.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }

                attempt += 1;
                let backoff = policy.backoff(attempt);

                // +/- 25% jitter from the clock's nanosecond component
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos();
                let jitter_factor = 0.75 + (nanos % 500) as f64 / 1000.0;
                let delay = backoff.mul_f64(jitter_factor);

                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient LLM failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
