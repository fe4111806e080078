//! TTL durations: parsing, formatting and the configurable default.
//!
//! Durations are written in the human-readable form understood by
//! [`humantime`], e.g. `10m`, `1h 30m`, `2days`. The compact form `1h0m0s`
//! is accepted on input as well.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

use crate::error::TypeError;

/// TTL used when neither the caller nor the environment provides one.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10 * 60);

/// Environment variable overriding [`DEFAULT_DURATION`].
pub const DEFAULT_DURATION_ENV: &str = "EXPIRE_DEFAULT_DURATION";

/// Parse a human-readable duration string.
pub fn parse_duration(input: &str) -> Result<Duration, TypeError> {
    humantime::parse_duration(input.trim()).map_err(|e| TypeError::InvalidDuration {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Format a duration so that [`parse_duration`] yields the same magnitude.
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

/// The default TTL, honouring `EXPIRE_DEFAULT_DURATION`.
pub fn default_duration() -> Duration {
    let value = std::env::var(DEFAULT_DURATION_ENV).ok();
    default_duration_from(value.as_deref())
}

/// Resolve the default TTL from an optional override string.
///
/// Missing, unparsable and zero values all fall back to [`DEFAULT_DURATION`];
/// an unparsable value is logged.
pub fn default_duration_from(value: Option<&str>) -> Duration {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return DEFAULT_DURATION;
    };

    match parse_duration(raw) {
        Ok(duration) if !duration.is_zero() => duration,
        Ok(_) => DEFAULT_DURATION,
        Err(e) => {
            warn!(
                env = DEFAULT_DURATION_ENV,
                value = raw,
                error = %e,
                "could not parse default duration; proceeding with built-in default"
            );
            DEFAULT_DURATION
        }
    }
}

/// The instant `duration` after `now`, saturating at the maximum timestamp.
pub fn expiry_after(now: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(duration)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
