//! `touch` and `renew`: restart the timer of an existing record.
//!
//! Both locate the first record for the target in expiry order and replace
//! it with an updated copy. They differ only in the update rule: `touch`
//! restarts the timer only for unexpired records marked reset-on-touch,
//! `renew` always does.

use expire_types::ExpirationRecord;
use tracing::debug;

use crate::config::{open_ledger, require_target, Context, RenewConfig, TouchConfig, UpdateConfig};
use crate::error::LedgerResult;
use crate::plan::{Action, DryRunReporter, Plan, Rejection};

/// Plan replacing the first record for `config.target` with
/// `update(record)`. `verb` names the operation in reports.
///
/// A found record is always written back, even if `update` left it
/// unchanged.
pub fn plan_update<F>(
    config: &UpdateConfig,
    ctx: &Context,
    verb: &'static str,
    update: F,
) -> LedgerResult<Plan>
where
    F: FnOnce(&ExpirationRecord) -> ExpirationRecord,
{
    require_target(&config.target)?;

    let Some((path, mut records)) = open_ledger(&config.global, ctx)? else {
        return Ok(Plan::rejected(Rejection::NoLedger {
            name: config.global.file_name().to_string(),
        }));
    };

    if !records.update_first(|r| r.target == config.target, update) {
        return Ok(Plan::rejected(Rejection::RecordNotFound {
            target: config.target.clone(),
            verb,
        }));
    }
    debug!(target = %config.target, verb, "planning update");

    Ok(Plan::single(Action::WriteLedger {
        path,
        records,
        change: format!("Will {verb} record: {}", config.target),
    }))
}

pub fn plan_touch(config: &TouchConfig, ctx: &Context) -> LedgerResult<Plan> {
    plan_update(config, ctx, "touch", |r| r.touched(ctx.now))
}

pub fn plan_renew(config: &RenewConfig, ctx: &Context) -> LedgerResult<Plan> {
    plan_update(config, ctx, "renew", |r| r.renewed(ctx.now))
}

pub fn touch(
    config: &TouchConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<()> {
    plan_touch(config, ctx)?.execute(config.mode, reporter)
}

pub fn renew(
    config: &RenewConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<()> {
    plan_renew(config, ctx)?.execute(config.mode, reporter)
}
