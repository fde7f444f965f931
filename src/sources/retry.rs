// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for source fetches.
//!
//! Transient failures (HTTP 429/5xx, connection errors, Kubernetes API 5xx)
//! are retried with jittered exponential backoff. Permanent failures such as
//! 401 or 404 fail immediately. Retrying lives here, in the transport layer,
//! and never in the reconciliation core.

use crate::errors::SourceError;
use rand::Rng;
use reqwest::StatusCode;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Maximum total time to spend retrying a Kubernetes call (2 minutes)
const KUBE_MAX_ELAPSED_TIME_SECS: u64 = 120;

/// Initial Kubernetes retry interval (100ms)
const KUBE_INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between Kubernetes retries (10 seconds)
const KUBE_MAX_INTERVAL_SECS: u64 = 10;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
const RANDOMIZATION_FACTOR: f64 = 0.1;

/// HTTP retry initial interval (50ms)
const HTTP_INITIAL_INTERVAL_MILLIS: u64 = 50;

/// HTTP retry maximum interval (10 seconds)
const HTTP_MAX_INTERVAL_SECS: u64 = 10;

/// HTTP retry maximum elapsed time (1 minute)
const HTTP_MAX_ELAPSED_TIME_SECS: u64 = 60;

/// Simple exponential backoff implementation.
///
/// Provides exponential backoff with randomization (jitter) to prevent thundering herd.
pub struct ExponentialBackoff {
    /// Current interval duration
    pub current_interval: Duration,
    /// Initial interval duration
    pub initial_interval: Duration,
    /// Maximum interval duration
    pub max_interval: Duration,
    /// Maximum total elapsed time
    pub max_elapsed_time: Option<Duration>,
    /// Backoff multiplier (typically 2.0 for doubling)
    pub multiplier: f64,
    /// Randomization factor (e.g., 0.1 for ±10%)
    pub randomization_factor: f64,
    /// Start time for tracking total elapsed time
    start_time: Instant,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff with specified parameters.
    #[must_use]
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        max_elapsed_time: Option<Duration>,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            current_interval: initial_interval,
            initial_interval,
            max_interval,
            max_elapsed_time,
            multiplier,
            randomization_factor,
            start_time: Instant::now(),
        }
    }

    /// Get the next backoff interval, or None if max elapsed time exceeded.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max_elapsed) = self.max_elapsed_time {
            if self.start_time.elapsed() >= max_elapsed {
                return None;
            }
        }

        let interval = self.current_interval;
        let jittered = self.apply_jitter(interval);

        let next = interval.as_secs_f64() * self.multiplier;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(jittered)
    }

    /// Apply randomization (jitter) to an interval.
    fn apply_jitter(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let secs = interval.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let min = secs - delta;
        let max = secs + delta;

        let jittered = rand::rng().random_range(min..=max);

        Duration::from_secs_f64(jittered.max(0.0))
    }
}

/// Backoff for Kubernetes API calls (secret read, pod listing).
///
/// 100ms initial, doubling up to 10s, at most 2 minutes in total, ±10% jitter.
#[must_use]
pub fn kube_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(KUBE_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(KUBE_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(KUBE_MAX_ELAPSED_TIME_SECS)),
        BACKOFF_MULTIPLIER,
        RANDOMIZATION_FACTOR,
    )
}

/// Backoff for SLS HTTP calls.
///
/// # Retry Schedule
///
/// 1. 50ms
/// 2. 100ms
/// 3. 200ms
/// 4. 400ms
/// 5. 800ms
/// 6. 1.6s
/// 7. 3.2s
/// 8. 6.4s
/// 9. 10s (capped at max interval)
///    10+. 10s intervals until 1 minute elapsed
#[must_use]
pub fn http_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        Duration::from_millis(HTTP_INITIAL_INTERVAL_MILLIS),
        Duration::from_secs(HTTP_MAX_INTERVAL_SECS),
        Some(Duration::from_secs(HTTP_MAX_ELAPSED_TIME_SECS)),
        BACKOFF_MULTIPLIER,
        RANDOMIZATION_FACTOR,
    )
}

/// Determine if an HTTP status code is retryable.
///
/// - **429** (Too Many Requests) - Rate limiting
/// - **500** (Internal Server Error) - Server error
/// - **502** (Bad Gateway) - Proxy/gateway error
/// - **503** (Service Unavailable) - Temporary unavailability
/// - **504** (Gateway Timeout) - Gateway timeout
#[must_use]
pub fn is_retryable_http_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Determine if a source error is worth retrying.
///
/// Transport failures and retryable HTTP statuses are transient; malformed
/// documents, missing fields and client errors are not.
#[must_use]
pub fn is_retryable_source_error(err: &SourceError) -> bool {
    match err {
        SourceError::Transport { .. } => true,
        SourceError::HttpStatus { status_code, .. } => StatusCode::from_u16(*status_code)
            .map(is_retryable_http_status)
            .unwrap_or(false),
        _ => false,
    }
}

/// Determine if a Kubernetes error is retryable.
///
/// Rate limiting (429), server errors (5xx) and service/connection errors are
/// retried; everything else fails immediately.
#[must_use]
pub fn is_retryable_kube_error(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(api_err) => {
            api_err.code == 429 || (api_err.code >= 500 && api_err.code < 600)
        }
        kube::Error::Service(_) => true,
        _ => false,
    }
}

/// Retry an operation with exponential backoff.
///
/// # Errors
///
/// Returns the last error if it is not retryable or the backoff is exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    operation_name: &str,
    mut backoff: ExponentialBackoff,
    is_retryable: fn(&E) -> bool,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start_time = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Call succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable error, failing immediately"
                    );
                    return Err(e);
                }

                if let Some(duration) = backoff.next_backoff() {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %e,
                        "Retryable error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                } else {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Backoff exhausted, giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Retry an SLS HTTP call with [`http_backoff`].
///
/// # Errors
///
/// Returns the last [`SourceError`] once retrying stops.
pub async fn retry_http_call<T, F, Fut>(operation: F, operation_name: &str) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    retry_with_backoff(
        operation,
        operation_name,
        http_backoff(),
        is_retryable_source_error,
    )
    .await
}

/// Retry a Kubernetes API call with [`kube_backoff`].
///
/// # Errors
///
/// Returns the last [`kube::Error`] once retrying stops.
pub async fn retry_api_call<T, F, Fut>(operation: F, operation_name: &str) -> Result<T, kube::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, kube::Error>>,
{
    retry_with_backoff(operation, operation_name, kube_backoff(), is_retryable_kube_error).await
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
