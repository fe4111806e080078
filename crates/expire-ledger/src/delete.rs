use tracing::debug;

use crate::config::{open_ledger, require_target, Context, DeleteConfig};
use crate::error::LedgerResult;
use crate::plan::{Action, DryRunReporter, Plan, Rejection};

/// Plan removing the first record for `config.target`.
///
/// With `de_init`, a ledger left empty is deleted instead of rewritten.
pub fn plan_delete(config: &DeleteConfig, ctx: &Context) -> LedgerResult<Plan> {
    require_target(&config.target)?;

    let Some((path, mut records)) = open_ledger(&config.global, ctx)? else {
        return Ok(Plan::rejected(Rejection::NoLedger {
            name: config.global.file_name().to_string(),
        }));
    };

    if records.delete_first(|r| r.target == config.target).is_none() {
        return Ok(Plan::rejected(Rejection::RecordNotFound {
            target: config.target.clone(),
            verb: "delete",
        }));
    }
    debug!(target = %config.target, remaining = records.len(), "planning delete");

    let change = format!("Will delete record: {}", config.target);
    if config.de_init && records.is_empty() {
        let mut plan = Plan::single(Action::Note(change));
        plan.push(Action::RemoveLedger { path });
        return Ok(plan);
    }
    Ok(Plan::single(Action::WriteLedger {
        path,
        records,
        change,
    }))
}

pub fn delete(
    config: &DeleteConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<()> {
    plan_delete(config, ctx)?.execute(config.mode, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use chrono::Utc;
    use expire_store::{load, save};
    use expire_types::{ExpirationRecord, ExpirationRecords};

    use crate::config::RunMode;
    use crate::error::LedgerError;
    use crate::plan::RecordingReporter;

    fn seed(dir: &Path, targets: &[&str]) -> PathBuf {
        let path = dir.join(".expirations");
        let now = Utc::now();
        let records: ExpirationRecords = targets
            .iter()
            .map(|t| ExpirationRecord::starting_at(*t, now, Duration::from_secs(60), false))
            .collect();
        save(&path, &records).unwrap();
        path
    }

    fn config(target: &str, de_init: bool) -> DeleteConfig {
        DeleteConfig {
            target: target.into(),
            de_init,
            ..Default::default()
        }
    }

    #[test]
    fn removes_only_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a", "b", "a"]);
        let ctx = Context::new(dir.path(), Utc::now());

        delete(&config("a", false), &ctx, &mut RecordingReporter::new()).unwrap();

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.iter().filter(|r| r.target == "a").count(), 1);
    }

    #[test]
    fn de_init_removes_emptied_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a"]);
        let ctx = Context::new(dir.path(), Utc::now());

        delete(&config("a", true), &ctx, &mut RecordingReporter::new()).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn de_init_keeps_non_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a", "b"]);
        let ctx = Context::new(dir.path(), Utc::now());

        delete(&config("a", true), &ctx, &mut RecordingReporter::new()).unwrap();

        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn emptied_ledger_survives_without_de_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a"]);
        let ctx = Context::new(dir.path(), Utc::now());

        delete(&config("a", false), &ctx, &mut RecordingReporter::new()).unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_record_batch_and_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a"]);
        let before = std::fs::read(&path).unwrap();
        let ctx = Context::new(dir.path(), Utc::now());

        let batch = DeleteConfig {
            mode: RunMode { dry_run: false, batch_run: true },
            ..config("zzz", false)
        };
        delete(&batch, &ctx, &mut RecordingReporter::new()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), before);

        let err = delete(&config("zzz", false), &ctx, &mut RecordingReporter::new()).unwrap_err();
        assert!(matches!(err, LedgerError::RecordNotFound { .. }));
    }

    #[test]
    fn dry_run_reports_ledger_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = seed(dir.path(), &["a"]);
        let ctx = Context::new(dir.path(), Utc::now());
        let cfg = DeleteConfig {
            mode: RunMode { dry_run: true, batch_run: false },
            ..config("a", true)
        };

        let mut reporter = RecordingReporter::new();
        delete(&cfg, &ctx, &mut reporter).unwrap();

        assert!(path.exists());
        assert_eq!(reporter.actions.len(), 2);
        assert_eq!(reporter.actions[0], "Will delete record: a");
        assert!(reporter.actions[1].starts_with("Will delete the file: "));
    }

    #[test]
    fn empty_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), Utc::now());
        let err = plan_delete(&config("", false), &ctx).unwrap_err();
        assert!(matches!(err, LedgerError::NoTarget));
    }
}
