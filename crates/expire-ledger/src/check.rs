use expire_types::TargetState;
use tracing::debug;

use crate::config::{open_ledger, require_target, CheckConfig, Context};
use crate::error::LedgerResult;

/// The state of `config.target` at `ctx.now`.
///
/// A missing ledger is not an error: the target is simply untracked.
pub fn check(config: &CheckConfig, ctx: &Context) -> LedgerResult<TargetState> {
    require_target(&config.target)?;

    let Some((_, records)) = open_ledger(&config.global, ctx)? else {
        return Ok(TargetState::Untracked);
    };
    let state = records
        .find_first(|r| r.target == config.target)
        .map_or(TargetState::Untracked, |r| r.state(ctx.now));
    debug!(target = %config.target, %state, "checked");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use expire_store::save;
    use expire_types::{ExpirationRecord, ExpirationRecords};

    use crate::config::{CreateConfig, InitConfig};
    use crate::error::LedgerError;
    use crate::plan::RecordingReporter;
    use crate::{create, init};

    fn config(target: &str) -> CheckConfig {
        CheckConfig {
            target: target.into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_then_check_is_unexpired() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Utc::now());
        init(&InitConfig::default(), &ctx, &mut RecordingReporter::new()).unwrap();
        let cfg = CreateConfig {
            target: "a".into(),
            ..Default::default()
        };
        create(&cfg, &ctx, &mut RecordingReporter::new()).unwrap();

        assert_eq!(check(&config("a"), &ctx).unwrap(), TargetState::TrackedUnexpired);
    }

    #[test]
    fn expired_and_untracked() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let records: ExpirationRecords = vec![ExpirationRecord::new(
            "old",
            now - TimeDelta::minutes(5),
            Duration::from_secs(60),
            false,
        )]
        .into_iter()
        .collect();
        save(&dir.path().join(".expirations"), &records).unwrap();
        let ctx = Context::new(dir.path(), now);

        assert_eq!(check(&config("old"), &ctx).unwrap(), TargetState::TrackedExpired);
        assert_eq!(check(&config("new"), &ctx).unwrap(), TargetState::Untracked);
    }

    #[test]
    fn no_ledger_is_untracked() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Utc::now());
        assert_eq!(check(&config("a"), &ctx).unwrap(), TargetState::Untracked);
    }

    #[test]
    fn empty_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Utc::now());
        assert!(matches!(check(&config(""), &ctx), Err(LedgerError::NoTarget)));
    }
}
