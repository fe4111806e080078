//! Listing and sweeping records.
//!
//! A query selects records through a [`QueryFilter`](crate::QueryFilter)
//! and the expiry/limit cutoff of
//! [`filter_extract`](expire_types::ExpirationRecords::filter_extract). With
//! `remove` set, the matched records are also dropped from the ledger.

use std::collections::HashMap;
use std::path::PathBuf;

use expire_types::ExpirationRecord;
use tracing::debug;

use crate::config::{ledger_dir, open_ledger, Context, QueryConfig, RunMode};
use crate::error::{LedgerError, LedgerResult};
use crate::plan::{Action, DryRunReporter, Plan};

/// The matched records of a query and the effects it wants.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The ledger that was queried.
    pub ledger: PathBuf,
    /// Matched records in expiry order, carrying `resolved_path` when their
    /// target file exists.
    pub records: Vec<ExpirationRecord>,
    /// Empty unless matches are to be removed.
    pub plan: Plan,
}

pub fn plan_query(config: &QueryConfig, ctx: &Context) -> LedgerResult<QueryOutcome> {
    let Some((ledger, mut records)) = open_ledger(&config.global, ctx)? else {
        return Err(LedgerError::NoLedger {
            name: config.global.file_name().to_string(),
        });
    };

    let filter = config.filter.compile(ledger_dir(&ledger), &ctx.cwd);
    let mut resolved: HashMap<String, PathBuf> = HashMap::new();
    let matched = records.filter_extract(ctx.now, config.expired, config.limit, config.remove, |r| {
        let verdict = filter.evaluate(r);
        if let Some(path) = verdict.resolved {
            resolved.insert(r.target.clone(), path);
        }
        verdict.accepted
    });
    debug!(ledger = %ledger.display(), matched = matched.len(), remove = config.remove, "query evaluated");

    let mut plan = Plan::new();
    if config.remove && !matched.is_empty() {
        for record in &matched {
            plan.push(Action::Note(format!("Will delete record: {}", record.target)));
        }
        plan.push(Action::WriteLedger {
            path: ledger.clone(),
            records,
            change: format!("Would rewrite {}", ledger.display()),
        });
    }

    let records = matched
        .into_iter()
        .map(|r| match resolved.get(&r.target) {
            Some(path) => r.with_resolved_path(path.clone()),
            None => r,
        })
        .collect();

    Ok(QueryOutcome {
        ledger,
        records,
        plan,
    })
}

/// Run a query, applying any removal, and return the matched records.
pub fn query(
    config: &QueryConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<Vec<ExpirationRecord>> {
    let outcome = plan_query(config, ctx)?;
    let mode = RunMode {
        dry_run: config.dry_run,
        batch_run: false,
    };
    outcome.plan.execute(mode, reporter)?;
    Ok(outcome.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use chrono::{DateTime, TimeDelta, Utc};
    use expire_store::{load, save};
    use expire_types::ExpirationRecords;

    use crate::filter::QueryFilter;
    use crate::plan::RecordingReporter;

    /// `A` expires in an hour, `B` expired an hour ago, `C` expired two
    /// hours ago. Only `B` has a file on disk.
    fn seed(dir: &Path, now: DateTime<Utc>) -> PathBuf {
        let path = dir.join(".expirations");
        let rec = |t: &str, hours: i64| {
            ExpirationRecord::new(t, now + TimeDelta::hours(hours), Duration::from_secs(60), false)
        };
        let records: ExpirationRecords = vec![rec("A", 1), rec("B", -1), rec("C", -2)]
            .into_iter()
            .collect();
        save(&path, &records).unwrap();
        fs::write(dir.join("B"), "x").unwrap();
        path
    }

    fn targets(records: &[ExpirationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.target.as_str()).collect()
    }

    #[test]
    fn expired_only_returns_expired_records() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        seed(dir.path(), now);
        let cfg = QueryConfig { expired: true, ..Default::default() };

        let found = query(&cfg, &Context::new(dir.path(), now), &mut RecordingReporter::new())
            .unwrap();

        assert_eq!(targets(&found), ["C", "B"]);
        assert!(found.iter().all(|r| r.is_expired(now)));
    }

    #[test]
    fn limit_caps_matches() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        seed(dir.path(), now);
        let cfg = QueryConfig { limit: 2, ..Default::default() };

        let found = query(&cfg, &Context::new(dir.path(), now), &mut RecordingReporter::new())
            .unwrap();

        assert_eq!(targets(&found), ["C", "B"]);
    }

    #[test]
    fn existing_files_are_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        seed(dir.path(), now);
        let cfg = QueryConfig {
            filter: QueryFilter { exist: true, ..Default::default() },
            ..Default::default()
        };

        let found = query(&cfg, &Context::new(dir.path(), now), &mut RecordingReporter::new())
            .unwrap();

        assert_eq!(targets(&found), ["B"]);
        assert_eq!(found[0].resolved_path.as_deref(), Some(dir.path().join("B").as_path()));
        assert_eq!(found[0].target_contextual(dir.path()), "B");
    }

    #[test]
    fn contextual_target_is_relative_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        seed(dir.path(), now);
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let found = query(&QueryConfig::default(), &Context::new(&sub, now), &mut RecordingReporter::new())
            .unwrap();

        let b = found.iter().find(|r| r.target == "B").unwrap();
        assert_eq!(b.target_contextual(&sub), format!("..{}B", std::path::MAIN_SEPARATOR));
        let a = found.iter().find(|r| r.target == "A").unwrap();
        assert_eq!(a.target_contextual(&sub), "A");
    }

    #[test]
    fn remove_drops_matches_from_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let path = seed(dir.path(), now);
        let cfg = QueryConfig { expired: true, remove: true, ..Default::default() };

        let found = query(&cfg, &Context::new(dir.path(), now), &mut RecordingReporter::new())
            .unwrap();

        assert_eq!(found.len(), 2);
        let left = load(&path).unwrap();
        assert_eq!(targets(left.as_slice()), ["A"]);
    }

    #[test]
    fn remove_without_matches_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        seed(dir.path(), now);
        let cfg = QueryConfig {
            remove: true,
            filter: QueryFilter { regexes: vec!["^nothing$".into()], ..Default::default() },
            ..Default::default()
        };

        let outcome = plan_query(&cfg, &Context::new(dir.path(), now)).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.plan.actions().is_empty());
    }

    #[test]
    fn dry_run_remove_reports_and_keeps_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let path = seed(dir.path(), now);
        let before = fs::read(&path).unwrap();
        let cfg = QueryConfig {
            expired: true,
            remove: true,
            dry_run: true,
            limit: 1,
            ..Default::default()
        };

        let mut reporter = RecordingReporter::new();
        let found = query(&cfg, &Context::new(dir.path(), now), &mut reporter).unwrap();

        assert_eq!(targets(&found), ["C"]);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(reporter.actions[0], "Will delete record: C");
        assert!(reporter.actions[1].starts_with("Would rewrite"));
    }

    #[test]
    fn missing_ledger_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = plan_query(&QueryConfig::default(), &Context::new(dir.path(), Utc::now()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NoLedger { .. }));
    }
}
