//! Retry and backoff for transient fetch failures.
//!
//! Error classification (timeouts, throttling, connection failures, 5xx) and
//! exponential backoff decisions live together here so the scheduler applies
//! one consistent policy to every row.

use std::time::Duration;

use crate::fetch::FetchError;

/// High-level classification of a fetch error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read/stall).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Retryable HTTP status that is not throttling (5xx).
    Http5xx(u16),
    /// Anything else; not retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff decision for a 1-based `attempt` that failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || kind == ErrorKind::Other {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), capped.
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}

/// Classifies a fetch error. Empty bodies, undersized videos, local I/O,
/// aborts, and video-client failures are never retried.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        // Short bodies usually mean the server dropped the connection.
        FetchError::Truncated { .. } => ErrorKind::Connection,
        FetchError::EmptyBody
        | FetchError::TooSmall { .. }
        | FetchError::Io(_)
        | FetchError::Aborted
        | FetchError::Client(_) => ErrorKind::Other,
    }
}

fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Runs `f` until it succeeds or the policy says stop. Sleeps the backoff
/// in place; call from blocking context only.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying fetch");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_and_5xx_are_retryable() {
        assert_eq!(classify(&FetchError::Http(429)), ErrorKind::Throttled);
        assert_eq!(classify(&FetchError::Http(503)), ErrorKind::Throttled);
        assert!(matches!(
            classify(&FetchError::Http(500)),
            ErrorKind::Http5xx(500)
        ));
    }

    #[test]
    fn client_errors_and_empty_bodies_are_not() {
        assert_eq!(classify(&FetchError::Http(404)), ErrorKind::Other);
        assert_eq!(classify(&FetchError::Http(403)), ErrorKind::Other);
        assert_eq!(classify(&FetchError::EmptyBody), ErrorKind::Other);
        assert_eq!(classify(&FetchError::Aborted), ErrorKind::Other);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 20,
            ..RetryPolicy::default()
        };
        let d1 = match policy.decide(1, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        let d2 = match policy.decide(2, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        assert!(d2 >= d1);
        let d_last = match policy.decide(12, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        assert!(d_last <= policy.max_delay);
    }

    #[test]
    fn respects_max_attempts() {
        let policy = RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        };
        assert!(matches!(
            policy.decide(1, ErrorKind::Throttled),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(policy.decide(2, ErrorKind::Throttled), RetryDecision::NoRetry);
    }

    #[test]
    fn run_with_retry_stops_on_non_retryable() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let result: Result<(), _> = run_with_retry(&policy, || {
            calls += 1;
            Err(FetchError::Http(404))
        });
        assert!(matches!(result, Err(FetchError::Http(404))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn run_with_retry_retries_transient_failures() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        };
        let mut calls = 0;
        let result = run_with_retry(&policy, || {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Http(503))
            } else {
                Ok(42u64)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }
}
