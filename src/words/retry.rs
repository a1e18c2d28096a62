//! Retry and backoff helpers for the word API.

use std::time::Duration;

use rand::Rng;

/// Retries after the first attempt.
pub const DEFAULT_NETWORK_RETRIES: u32 = 3;

/// Base delay for exponential backoff (500 ms).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Maximum delay cap for exponential backoff (10 seconds).
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// Connection failures, timeouts and truncated bodies are worth another try.
pub fn is_transient_network_error(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() || error.is_body() {
        return true;
    }

    error.status().is_some_and(is_transient_status)
}

/// 502, 503 and 504 usually clear up on their own.
pub fn is_transient_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 502..=504)
}

/// Delay before retry number `attempt` (zero-based): `base * 2^attempt`, plus up
/// to half of `base` in random jitter, never more than `max`.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let doubled = base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let jitter_cap = (base / 2).as_millis() as u64;
    let jitter = if jitter_cap == 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(rand::rng().random_range(0..=jitter_cap))
    };
    doubled.saturating_add(jitter).min(max)
}
