use expire_types::{format_duration, format_timestamp, ExpirationRecord, ExpirationRecords};
use tracing::debug;

use crate::config::{open_ledger, require_target, Context, CreateConfig};
use crate::error::LedgerResult;
use crate::plan::{Action, DryRunReporter, Plan, Rejection};

/// Plan the insertion of a new record for `config.target`.
///
/// An existing record for the same target is shadowed, not replaced,
/// unless `no_shadow` is set.
pub fn plan_create(config: &CreateConfig, ctx: &Context) -> LedgerResult<Plan> {
    require_target(&config.target)?;

    let mut plan = Plan::new();
    let (path, mut records) = match open_ledger(&config.global, ctx)? {
        Some(found) => found,
        None if config.init => {
            let path = config.global.local_path(ctx);
            plan.push(Action::CreateLedger { path: path.clone() });
            (path, ExpirationRecords::new())
        }
        None => {
            return Ok(Plan::rejected(Rejection::NoLedger {
                name: config.global.file_name().to_string(),
            }))
        }
    };

    if config.no_shadow && records.find_first(|r| r.target == config.target).is_some() {
        plan.push(Action::Reject(Rejection::ShadowConflict {
            target: config.target.clone(),
        }));
        return Ok(plan);
    }

    let duration = config
        .duration
        .filter(|d| !d.is_zero())
        .unwrap_or(ctx.default_duration);
    let record = ExpirationRecord::starting_at(
        config.target.as_str(),
        ctx.now,
        duration,
        config.reset_on_touch,
    );
    debug!(target = %record.target, expires = %record.expires, "planning insert");

    let change = format!(
        "Would insert record: {} (expires {}, duration {}, reset on touch: {})",
        record.target,
        format_timestamp(&record.expires),
        format_duration(record.duration),
        if record.reset_on_touch { "yes" } else { "no" },
    );
    records.insert(record);
    plan.push(Action::WriteLedger {
        path,
        records,
        change,
    });
    Ok(plan)
}

pub fn create(
    config: &CreateConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<()> {
    plan_create(config, ctx)?.execute(config.mode, reporter)
}
