//! Expiry timestamps in their persisted RFC 3339 form.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::TypeError;

/// Render an expiry instant as RFC 3339 at whole-second resolution.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC 3339 timestamp with any offset into UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TypeError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| TypeError::InvalidTimestamp {
            input: input.to_string(),
            reason: e.to_string(),
        })
}
