//! Position acquisition with bounded retry.
//!
//! Platform location services sometimes report a transient "location unknown"
//! failure while the receiver warms up. [`resolve_position`] retries that one
//! failure class with a linear backoff and surfaces every other error at once.
//!
//! It retries ONLY when [`is_transient_location_unknown`] matches:
//! - permission denials fail immediately
//! - hardware/service failures fail immediately
//! - the final attempt's error is returned unchanged

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{LocationError, PermissionStatus, Position};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 400;

/// Lower-case fragments of provider messages that mean "not known yet, ask again".
///
/// Add new vendor wording here; the retry loop does not need to change.
pub const TRANSIENT_LOCATION_MARKERS: &[&str] = &[
    "kclerrorlocationunknown",
    "kclerror",
    "locationunknown",
    "cleerrordomain",
    "e_location_unavailable",
];

/// Check whether an error (or a bare message) is the transient "location unknown" failure.
pub fn is_transient_location_unknown<E>(error: &E) -> bool
where
    E: fmt::Display + ?Sized,
{
    let message = error.to_string().to_lowercase();
    TRANSIENT_LOCATION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Platform location service
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for (or check) permission to read the device location
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// Read the current position once
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Waiting capability used between attempts, injectable for tests
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Provider that always reports a configured position.
///
/// Used where no platform location service exists (desktop, CLI).
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    position: Option<Position>,
}

impl FixedLocationProvider {
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        self.position.ok_or(LocationError::ServiceUnavailable)
    }
}

/// Retry budget for position resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff step; the wait after attempt `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Wait inserted after the failed `attempt` (1-based). Linear, no cap, no jitter.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl From<&wetter_core::LocationConfig> for RetryPolicy {
    fn from(config: &wetter_core::LocationConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay_ms)
    }
}

/// Resolve the current position, retrying transient "location unknown" failures.
///
/// Attempts run strictly one after another. On exhaustion the last provider
/// error is returned as-is.
pub async fn resolve_position<P, D>(
    provider: &P,
    delay: &D,
    policy: &RetryPolicy,
) -> Result<Position, LocationError>
where
    P: LocationProvider + ?Sized,
    D: Delay + ?Sized,
{
    resolve(provider, delay, policy, None).await
}

/// Same as [`resolve_position`], but gives up with [`LocationError::Cancelled`]
/// as soon as `cancel` fires while waiting between attempts.
pub async fn resolve_position_cancellable<P, D>(
    provider: &P,
    delay: &D,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Position, LocationError>
where
    P: LocationProvider + ?Sized,
    D: Delay + ?Sized,
{
    resolve(provider, delay, policy, Some(cancel)).await
}

async fn resolve<P, D>(
    provider: &P,
    delay: &D,
    policy: &RetryPolicy,
    cancel: Option<&CancellationToken>,
) -> Result<Position, LocationError>
where
    P: LocationProvider + ?Sized,
    D: Delay + ?Sized,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(LocationError::Cancelled);
        }

        match provider.current_position().await {
            Ok(position) => return Ok(position),
            Err(e) => {
                let retry = attempt < policy.max_attempts && is_transient_location_unknown(&e);
                last_error = Some(e);
                if !retry {
                    break;
                }

                let wait = policy.delay_after_attempt(attempt);
                match cancel {
                    Some(token) => {
                        tokio::select! {
                            _ = token.cancelled() => return Err(LocationError::Cancelled),
                            _ = delay.sleep(wait) => {}
                        }
                    }
                    None => delay.sleep(wait).await,
                }
            }
        }
    }

    Err(last_error.unwrap_or(LocationError::Undetermined))
}
