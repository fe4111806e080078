//! The [`ExpirationRecord`]: one tracked target.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::{expiry_after, format_duration};
use crate::path::relative_to;
use crate::state::TargetState;

/// Units shown by [`ExpirationRecord::expiration_relative`].
const RELATIVE_UNITS: usize = 2;

/// A single tracked target and its time-to-live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationRecord {
    /// Identifier of the target, usually a path relative to the ledger's
    /// directory.
    pub target: String,
    /// Instant at which the target expires.
    pub expires: DateTime<Utc>,
    /// The original TTL, reused verbatim on renew and touch.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// Whether a touch refreshes the expiry.
    pub reset_on_touch: bool,
    /// Absolute path of the target file. Only set by queries, and only when
    /// the file exists; never persisted.
    #[serde(skip)]
    pub resolved_path: Option<PathBuf>,
}

impl ExpirationRecord {
    /// Create a record with an explicit expiry.
    pub fn new(
        target: impl Into<String>,
        expires: DateTime<Utc>,
        duration: Duration,
        reset_on_touch: bool,
    ) -> Self {
        Self {
            target: target.into(),
            expires,
            duration,
            reset_on_touch,
            resolved_path: None,
        }
    }

    /// Create a record that expires `duration` after `now`.
    pub fn starting_at(
        target: impl Into<String>,
        now: DateTime<Utc>,
        duration: Duration,
        reset_on_touch: bool,
    ) -> Self {
        Self::new(target, expiry_after(now, duration), duration, reset_on_touch)
    }

    /// Returns `true` once the expiry is not after `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// Tracked state of this record at `now`.
    pub fn state(&self, now: DateTime<Utc>) -> TargetState {
        if self.is_expired(now) {
            TargetState::TrackedExpired
        } else {
            TargetState::TrackedUnexpired
        }
    }

    /// A copy with the timer restarted from `now`, regardless of state.
    pub fn renewed(&self, now: DateTime<Utc>) -> Self {
        Self {
            expires: expiry_after(now, self.duration),
            ..self.clone()
        }
    }

    /// A copy with the timer restarted from `now` if the record resets on
    /// touch and has not expired yet; otherwise an unchanged copy.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        if self.reset_on_touch && !self.is_expired(now) {
            self.renewed(now)
        } else {
            self.clone()
        }
    }

    /// A copy carrying the absolute path of its target file.
    pub fn with_resolved_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.resolved_path = Some(path.into());
        self
    }

    /// The target as seen from `cwd`: the resolved file path relative to
    /// `cwd` when known, otherwise the raw target.
    pub fn target_contextual(&self, cwd: &Path) -> String {
        self.resolved_path
            .as_deref()
            .and_then(|abs| relative_to(abs, cwd))
            .map(|rel| rel.display().to_string())
            .unwrap_or_else(|| self.target.clone())
    }

    /// Human description of the expiry relative to `now`, e.g. `in 5m` or
    /// `1h 2m ago`. Only the two largest units are kept.
    pub fn expiration_relative(&self, now: DateTime<Utc>) -> String {
        let delta = self.expires.signed_duration_since(now).num_seconds();
        if delta == 0 {
            return "now".to_string();
        }
        let full = format_duration(Duration::from_secs(delta.unsigned_abs()));
        let magnitude = full
            .split_whitespace()
            .take(RELATIVE_UNITS)
            .collect::<Vec<_>>()
            .join(" ");
        if delta > 0 {
            format!("in {magnitude}")
        } else {
            format!("{magnitude} ago")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn starting_at_sets_expiry() {
        let now = at("2024-01-01T00:00:00Z");
        let rec = ExpirationRecord::starting_at("a.txt", now, Duration::from_secs(600), false);
        assert_eq!(rec.expires, at("2024-01-01T00:10:00Z"));
        assert_eq!(rec.state(now), TargetState::TrackedUnexpired);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = at("2024-01-01T00:00:00Z");
        let rec = ExpirationRecord::new("a", now, Duration::from_secs(1), false);
        assert!(rec.is_expired(now));
        assert_eq!(rec.state(now), TargetState::TrackedExpired);
    }

    #[test]
    fn renew_ignores_reset_flag_and_expiry() {
        let now = at("2024-01-01T12:00:00Z");
        let rec = ExpirationRecord::new(
            "a",
            now - TimeDelta::hours(1),
            Duration::from_secs(60),
            false,
        );
        let renewed = rec.renewed(now);
        assert_eq!(renewed.expires, at("2024-01-01T12:01:00Z"));
        assert_eq!(renewed.duration, rec.duration);
    }

    #[test]
    fn touch_refreshes_only_live_resettable_records() {
        let now = at("2024-01-01T12:00:00Z");
        let live = ExpirationRecord::new("a", now + TimeDelta::seconds(5), Duration::from_secs(60), true);
        assert_eq!(live.touched(now).expires, at("2024-01-01T12:01:00Z"));

        let no_reset = ExpirationRecord { reset_on_touch: false, ..live.clone() };
        assert_eq!(no_reset.touched(now), no_reset);

        let expired = ExpirationRecord { expires: now - TimeDelta::seconds(5), ..live };
        assert_eq!(expired.touched(now), expired);
    }

    #[test]
    fn contextual_target_prefers_resolved_path() {
        let rec = ExpirationRecord::new("logs/a.log", Utc::now(), Duration::from_secs(1), false);
        assert_eq!(rec.target_contextual(Path::new("/srv/app")), "logs/a.log");

        let rec = rec.with_resolved_path("/srv/logs/a.log");
        assert_eq!(rec.target_contextual(Path::new("/srv/app")), "../logs/a.log");
    }

    #[test]
    fn relative_expiration() {
        let now = at("2024-01-01T12:00:00Z");
        let rec = ExpirationRecord::new("a", now + TimeDelta::minutes(5), Duration::from_secs(1), false);
        assert_eq!(rec.expiration_relative(now), "in 5m");

        let rec = ExpirationRecord::new("a", now - TimeDelta::seconds(90), Duration::from_secs(1), false);
        assert_eq!(rec.expiration_relative(now), "1m 30s ago");

        let rec = ExpirationRecord::new("a", now, Duration::from_secs(1), false);
        assert_eq!(rec.expiration_relative(now), "now");
    }

    #[test]
    fn relative_expiration_keeps_two_largest_units() {
        let now = at("2024-01-01T12:00:00Z");
        let delta = TimeDelta::hours(2) + TimeDelta::minutes(3) + TimeDelta::seconds(4);
        let rec = ExpirationRecord::new("a", now + delta, Duration::from_secs(1), false);
        assert_eq!(rec.expiration_relative(now), "in 2h 3m");

        let delta = TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::minutes(3);
        let rec = ExpirationRecord::new("a", now - delta, Duration::from_secs(1), false);
        assert_eq!(rec.expiration_relative(now), "1day 2h ago");
    }

    #[test]
    fn serde_skips_resolved_path() {
        let rec = ExpirationRecord::new("a", at("2024-01-01T00:00:00Z"), Duration::from_secs(600), true)
            .with_resolved_path("/tmp/a");
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("resolved_path"));
        assert!(json.contains("\"duration\":\"10m\""));

        let parsed: ExpirationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.resolved_path, None);
        assert_eq!(parsed.duration, rec.duration);
    }
}
